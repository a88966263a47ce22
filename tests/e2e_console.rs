//! End-to-end checks against an in-process HTTP stub: real sockets,
//! real worker threads, rendered into a ratatui buffer.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::{Duration, Instant};

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;

use evgg_console::governance::client::ApiClient;
use evgg_console::governance::{AdminState, CopilotState, HomeState, PoliciesState};
use evgg_console::ui::admin_view::AdminView;
use evgg_console::ui::copilot_view::CopilotView;
use evgg_console::ui::home_view::HomeView;
use evgg_console::ui::policies_view::PoliciesView;

struct Route {
    method: &'static str,
    path_prefix: &'static str,
    status: u16,
    body: &'static str,
}

/// Serves the given routes forever on an ephemeral port. Unmatched
/// requests get a 404.
fn spawn_stub(routes: Vec<Route>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub");
    let base_url = format!("http://{}", listener.local_addr().expect("addr"));

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };

            let mut raw = Vec::new();
            let mut chunk = [0u8; 1024];
            let header_end = loop {
                match stream.read(&mut chunk) {
                    Ok(0) => break None,
                    Ok(n) => {
                        raw.extend_from_slice(&chunk[..n]);
                        if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                            break Some(pos + 4);
                        }
                    }
                    Err(_) => break None,
                }
            };
            let Some(header_end) = header_end else { continue };

            let head = String::from_utf8_lossy(&raw[..header_end]).to_string();
            let mut parts = head.split_whitespace();
            let method = parts.next().unwrap_or("").to_string();
            let path = parts.next().unwrap_or("").to_string();

            // Drain the body so the client sees a clean close.
            let content_length = head
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    if name.eq_ignore_ascii_case("content-length") {
                        value.trim().parse::<usize>().ok()
                    } else {
                        None
                    }
                })
                .unwrap_or(0);
            let mut body = raw[header_end..].to_vec();
            while body.len() < content_length {
                match stream.read(&mut chunk) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => body.extend_from_slice(&chunk[..n]),
                }
            }

            let (status, response_body) = routes
                .iter()
                .find(|r| r.method == method && path.starts_with(r.path_prefix))
                .map(|r| (r.status, r.body))
                .unwrap_or((404, r#"{"detail":"not found"}"#));

            let response = format!(
                "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                response_body.len(),
                response_body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });

    base_url
}

fn render_to_text<W: Widget>(widget: W, width: u16, height: u16) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    widget.render(area, &mut buf);

    let mut text = String::new();
    for y in 0..height {
        for x in 0..width {
            if let Some(cell) = buf.cell((x, y)) {
                text.push_str(cell.symbol());
            }
        }
        text.push('\n');
    }
    text
}

fn poll_until<F: FnMut() -> bool>(mut done: F) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !done() {
        assert!(Instant::now() < deadline, "timed out waiting for response");
        thread::sleep(Duration::from_millis(10));
    }
}

#[test]
fn compiling_a_policy_updates_the_preview() {
    let base_url = spawn_stub(vec![Route {
        method: "POST",
        path_prefix: "/api/policies/compile",
        status: 200,
        body: r#"{"policy_id":"P123","status":"compiled","validation_passed":true}"#,
    }]);
    let client = ApiClient::new(&base_url).expect("client");

    let mut state = PoliciesState::new("CS101");
    assert!(state.brainstorm_allowed);
    assert!(state.full_solution_banned);

    state.submit(&client);
    poll_until(|| {
        state.poll();
        !state.is_pending()
    });

    assert!(state.error().is_none());
    let compiled = state.compiled.as_deref().expect("compiled receipt");
    assert!(compiled.contains("P123"));
    assert!(compiled.contains("compiled"));

    let text = render_to_text(PoliciesView { state: &state }, 110, 36);
    assert!(text.contains("CS101"));
    assert!(text.contains("Brainstorming with AI allowed"));
    assert!(text.contains("Full AI solutions banned"));
    assert!(text.contains("P123"));
}

#[test]
fn failed_policy_compile_shows_an_error_and_no_receipt() {
    let base_url = spawn_stub(vec![Route {
        method: "POST",
        path_prefix: "/api/policies/compile",
        status: 422,
        body: r#"{"detail":"course_id is required"}"#,
    }]);
    let client = ApiClient::new(&base_url).expect("client");

    let mut state = PoliciesState::new("CS101");
    state.submit(&client);
    poll_until(|| {
        state.poll();
        !state.is_pending()
    });

    assert!(state.compiled.is_none());
    let err = state.error().expect("error surfaced");
    assert!(err.contains("course_id is required"), "got: {err}");

    let text = render_to_text(PoliciesView { state: &state }, 110, 36);
    assert!(text.contains("Compile failed"));
}

#[test]
fn unreachable_analytics_falls_back_to_reference_view() {
    let base_url = spawn_stub(vec![Route {
        method: "GET",
        path_prefix: "/api/transparency/course-analytics/",
        status: 500,
        body: r#"{"detail":"analytics store offline"}"#,
    }]);
    let client = ApiClient::new(&base_url).expect("client");

    let mut state = AdminState::new(&client, "CS101");
    poll_until(|| {
        state.poll();
        !state.is_pending()
    });

    assert!(state.error().is_some());
    assert_eq!(state.view.unique_students, 42);
    assert_eq!(state.view.total_events, 64);
    assert_eq!(state.view.compliance_rate, "85%");

    let text = render_to_text(AdminView { state: &state }, 110, 36);
    assert!(text.contains("85%"));
    assert!(text.contains("reference analytics"));
    assert!(text.contains("brainstorm"));
}

#[test]
fn live_analytics_replaces_the_reference_view() {
    let base_url = spawn_stub(vec![Route {
        method: "GET",
        path_prefix: "/api/transparency/course-analytics/",
        status: 200,
        body: r#"{"course_id":"CS101","unique_students":7,"total_events":10,"by_action":{"brainstorm":6,"code_review":2,"full_solution":2},"compliance_rate":"80%"}"#,
    }]);
    let client = ApiClient::new(&base_url).expect("client");

    let mut state = AdminState::new(&client, "CS101");
    poll_until(|| {
        state.poll();
        !state.is_pending()
    });

    assert!(state.error().is_none());
    assert_eq!(state.view.unique_students, 7);
    assert_eq!(state.view.total_events, 10);
    assert_eq!(state.view.compliance_rate, "80%");
}

#[test]
fn copilot_answer_streams_in_and_then_shows_confidence() {
    let base_url = spawn_stub(vec![Route {
        method: "POST",
        path_prefix: "/api/copilot/ask",
        status: 200,
        body: r#"{"answer":"YES","confidence":0.91,"citations":["CS101 Policy"]}"#,
    }]);
    let client = ApiClient::new(&base_url).expect("client");

    let mut state = CopilotState::new("CS101");
    state.ask(&client);
    poll_until(|| {
        state.poll();
        !state.is_pending()
    });

    assert_eq!(state.view.answer, "YES");
    assert_eq!(state.view.confidence_pct, 91);

    // Drive the reveal to completion.
    state.typewriter.tick(Instant::now());
    state
        .typewriter
        .tick(Instant::now() + Duration::from_secs(1));
    assert!(state.typewriter.is_complete());

    let text = render_to_text(
        CopilotView {
            state: &state,
            tick_count: 0,
        },
        110,
        36,
    );
    assert!(text.contains("YES"));
    assert!(text.contains("91% confident"));
    assert!(text.contains("CS101 Policy"));
}

#[test]
fn failed_home_fetch_keeps_defaults_and_names_the_error() {
    // Nothing listening at this address.
    let client = ApiClient::new("http://127.0.0.1:1").expect("client");

    let mut state = HomeState::new(&client, "CS101");
    poll_until(|| {
        state.poll();
        !state.is_pending()
    });

    assert!(!state.measured);
    assert_eq!(state.counters.allowed, 12);
    assert_eq!(state.counters.restricted, 5);
    assert_eq!(state.counters.compliance_pct, 98);

    let text = render_to_text(HomeView { state: &state }, 120, 36);
    assert!(text.contains("reference values"));
    assert!(text.contains("Cannot reach the governance service"));
}

#[test]
fn failed_ask_becomes_a_zero_confidence_answer() {
    // Nothing listening at this address.
    let client = ApiClient::new("http://127.0.0.1:1").expect("client");

    let mut state = CopilotState::new("CS101");
    state.ask(&client);
    poll_until(|| {
        state.poll();
        !state.is_pending()
    });

    assert_eq!(state.view.confidence_pct, 0);
    assert!(state.view.citations.is_empty());
    assert!(!state.view.answer.is_empty());
}
