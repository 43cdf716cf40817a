//! Video call screen
//!
//! Full-area remote view with a local preview box, header with duration
//! and connection info, and a control hint bar.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind};
use futures::StreamExt;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    DefaultTerminal, Frame,
};
use tokio::sync::mpsc;

use super::overlay;
use crate::call::controller::{CallController, ConnectionState};
use crate::call::engine::EngineEvent;

struct VideoCallScreen {
    confirm_end: bool,
    alert: Option<String>,
}

pub async fn run(
    terminal: &mut DefaultTerminal,
    mut controller: CallController,
    mut events: mpsc::UnboundedReceiver<EngineEvent>,
) -> Result<()> {
    let mut screen = VideoCallScreen {
        confirm_end: false,
        alert: None,
    };

    let result = drive(terminal, &mut controller, &mut events, &mut screen).await;

    // Cleanup runs on every exit path: the timer dies with the loop and
    // the engine is released without blocking navigation back.
    tokio::spawn(async move { controller.teardown().await });
    result
}

async fn drive(
    terminal: &mut DefaultTerminal,
    controller: &mut CallController,
    events: &mut mpsc::UnboundedReceiver<EngineEvent>,
    screen: &mut VideoCallScreen,
) -> Result<()> {
    if let Err(e) = controller.connect().await {
        // The screen stays in Connecting; the user exits manually.
        screen.alert = Some(format!("Could not start the call: {}", e));
    }

    let mut input = EventStream::new();
    let mut timer = tokio::time::interval(Duration::from_secs(1));
    timer.tick().await; // skip first immediate tick

    loop {
        terminal.draw(|frame| render(frame, controller, screen))?;

        tokio::select! {
            event = events.recv() => {
                if let Some(event) = event {
                    controller.handle_event(event);
                }
            }
            _ = timer.tick() => controller.tick(),
            key = input.next() => {
                match key {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if handle_key(key.code, controller, screen).await {
                            return Ok(());
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => return Ok(()),
                }
            }
        }
    }
}

/// Returns true when the screen should close.
async fn handle_key(
    code: KeyCode,
    controller: &mut CallController,
    screen: &mut VideoCallScreen,
) -> bool {
    if screen.alert.is_some() {
        screen.alert = None;
        return false;
    }
    if screen.confirm_end {
        match code {
            KeyCode::Char('y') | KeyCode::Enter => return true,
            KeyCode::Char('n') | KeyCode::Esc => screen.confirm_end = false,
            _ => {}
        }
        return false;
    }

    match code {
        KeyCode::Char('m') => controller.toggle_mute().await,
        KeyCode::Char('v') => controller.toggle_video().await,
        KeyCode::Char('c') => controller.switch_camera().await,
        KeyCode::Char('s') => controller.toggle_speaker().await,
        KeyCode::Char('e') | KeyCode::Char('q') | KeyCode::Esc => screen.confirm_end = true,
        _ => {}
    }
    false
}

fn render(frame: &mut Frame, controller: &CallController, screen: &VideoCallScreen) {
    let [header_area, main_area, controls_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(frame, header_area, controller);
    render_remote(frame, main_area, controller);
    render_local_preview(frame, main_area, controller);
    render_controls(frame, controls_area, controller);

    if let Some(message) = &screen.alert {
        overlay::render_alert(frame, "Call Failed", message);
    }
    if screen.confirm_end {
        overlay::render_confirm_end(frame);
    }
}

fn connection_span(controller: &CallController) -> Span<'static> {
    let (label, color) = match controller.connection {
        ConnectionState::Connected => (controller.connection.label(), Color::Green),
        ConnectionState::Connecting => (controller.connection.label(), Color::Yellow),
        ConnectionState::Disconnected => (controller.connection.label(), Color::Red),
    };
    Span::styled(label, Style::default().fg(color))
}

fn render_header(frame: &mut Frame, area: Rect, controller: &CallController) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", controller.group_name()),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {} ", controller.format_duration())),
        Span::raw("| "),
        connection_span(controller),
        Span::raw(" | quality: "),
        Span::raw(controller.quality.label()),
        Span::raw(format!(" | {} on call ", controller.participant_count())),
    ]);
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(Color::DarkGray)),
        area,
    );
}

fn render_remote(frame: &mut Frame, area: Rect, controller: &CallController) {
    let body = if controller.participant_count() > 1 {
        format!("{} participants on the call", controller.participant_count())
    } else if !controller.is_joined() {
        "Joining the call...".to_string()
    } else {
        "Waiting for others to join...".to_string()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", controller.channel()));

    let inner_height = area.height.saturating_sub(2);
    let mut lines = vec![Line::from(""); (inner_height / 2).saturating_sub(1) as usize];
    lines.push(Line::from(body));
    if let Some(err) = &controller.last_error {
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    frame.render_widget(
        Paragraph::new(lines).block(block).alignment(Alignment::Center),
        area,
    );
}

fn render_local_preview(frame: &mut Frame, main_area: Rect, controller: &CallController) {
    const PREVIEW_WIDTH: u16 = 20;
    const PREVIEW_HEIGHT: u16 = 5;
    if main_area.width < PREVIEW_WIDTH + 4 || main_area.height < PREVIEW_HEIGHT + 2 {
        return;
    }

    let area = Rect {
        x: main_area.right() - PREVIEW_WIDTH - 2,
        y: main_area.y + 1,
        width: PREVIEW_WIDTH,
        height: PREVIEW_HEIGHT,
    };

    let (content, color) = if controller.is_video_on {
        ("You", Color::Cyan)
    } else {
        ("Camera off", Color::Red)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    let mut lines = vec![Line::from(""), Line::from(content)];
    if controller.is_muted {
        lines.push(Line::from(Span::styled(
            "(muted)",
            Style::default().fg(Color::Red),
        )));
    }

    frame.render_widget(
        Paragraph::new(lines).block(block).alignment(Alignment::Center),
        area,
    );
}

fn render_controls(frame: &mut Frame, area: Rect, controller: &CallController) {
    let toggle = |on: bool, on_label: &'static str, off_label: &'static str| {
        if on {
            Span::styled(on_label, Style::default().fg(Color::Red))
        } else {
            Span::raw(off_label)
        }
    };

    let line = Line::from(vec![
        Span::raw(" m: "),
        toggle(controller.is_muted, "unmute", "mute"),
        Span::raw("  v: "),
        toggle(!controller.is_video_on, "start video", "stop video"),
        Span::raw("  c: flip camera  s: "),
        toggle(controller.is_speaker_on, "earpiece", "speaker"),
        Span::raw("  e: end call "),
    ]);

    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(Color::DarkGray)),
        area,
    );
}
