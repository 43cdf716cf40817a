//! Audio call screen
//!
//! Centered group name, call duration and status, with mute/speaker
//! controls. No video surface.

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
use crate::call::controller::{CallController, ConnectionState, NetworkQuality};
use crate::call::engine::EngineEvent;

struct AudioCallScreen {
    confirm_end: bool,
    alert: Option<String>,
}

pub async fn run(
    terminal: &mut DefaultTerminal,
    mut controller: CallController,
    mut events: mpsc::UnboundedReceiver<EngineEvent>,
) -> Result<()> {
    let mut screen = AudioCallScreen {
        confirm_end: false,
        alert: None,
    };

    let result = drive(terminal, &mut controller, &mut events, &mut screen).await;

    // Cleanup runs on every exit path, not only the end-call button.
    tokio::spawn(async move { controller.teardown().await });
    result
}

async fn drive(
    terminal: &mut DefaultTerminal,
    controller: &mut CallController,
    events: &mut mpsc::UnboundedReceiver<EngineEvent>,
    screen: &mut AudioCallScreen,
) -> Result<()> {
    if let Err(e) = controller.connect().await {
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
    screen: &mut AudioCallScreen,
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
        KeyCode::Char('s') => controller.toggle_speaker().await,
        KeyCode::Char('e') | KeyCode::Char('q') | KeyCode::Esc => screen.confirm_end = true,
        _ => {}
    }
    false
}

fn render(frame: &mut Frame, controller: &CallController, screen: &AudioCallScreen) {
    let [header_area, main_area, controls_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            " AUDIO CALL ",
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .style(Style::default().bg(Color::DarkGray)),
        header_area,
    );

    render_body(frame, main_area, controller);
    render_controls(frame, controls_area, controller);

    if let Some(message) = &screen.alert {
        overlay::render_alert(frame, "Call Failed", message);
    }
    if screen.confirm_end {
        overlay::render_confirm_end(frame);
    }
}

fn render_body(frame: &mut Frame, area: Rect, controller: &CallController) {
    let status = if controller.is_muted {
        Span::styled("Microphone muted", Style::default().fg(Color::Red))
    } else {
        match controller.connection {
            ConnectionState::Connected => {
                Span::styled(controller.connection.label(), Style::default().fg(Color::Green))
            }
            ConnectionState::Connecting => {
                Span::styled(controller.connection.label(), Style::default().fg(Color::Yellow))
            }
            ConnectionState::Disconnected => {
                Span::styled(controller.connection.label(), Style::default().fg(Color::Red))
            }
        }
    };

    let quality = match controller.quality {
        NetworkQuality::Unknown => Line::from(""),
        q => Line::from(format!("signal: {}", q.label())),
    };

    let inner_height = area.height.saturating_sub(2);
    let mut lines = vec![Line::from(""); (inner_height / 2).saturating_sub(3) as usize];
    lines.extend([
        Line::from("((( o )))"),
        Line::from(""),
        Line::from(Span::styled(
            controller.group_name().to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(controller.format_duration()),
        Line::from(status),
        quality,
        Line::from(format!("{} on call", controller.participant_count())),
    ]);
    if let Some(err) = &controller.last_error {
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center),
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
        Span::raw("  s: "),
        toggle(controller.is_speaker_on, "earpiece", "speaker"),
        Span::raw("  e: end call "),
    ]);

    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(Color::DarkGray)),
        area,
    );
}
