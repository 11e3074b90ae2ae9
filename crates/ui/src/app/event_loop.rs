use super::App;
use crate::event_handler::EventHandler;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::Result;
use std::{panic, time::Duration};
use tokio::time::MissedTickBehavior;

/// Drive the viewer until the user quits.
///
/// Input and emissions mark the screen dirty; drawing happens on the frame
/// interval so every deferred jump runs right after a committed frame.
pub async fn run(app: &mut App) -> Result<()> {
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), crossterm::terminal::EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let backend = CrosstermBackend::new(std::io::stdout());
        if let Ok(mut terminal) = Terminal::new(backend) {
            let _ = terminal.show_cursor();
        }
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    terminal.clear()?;

    let mut frames = tokio::time::interval(app.frame_interval());
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    while !app.should_exit {
        tokio::select! {
            _ = frames.tick() => {
                while let Some(event) = EventHandler::read(Duration::ZERO) {
                    app.handle_event(&event);
                    if app.should_exit {
                        break;
                    }
                }

                app.advance_tick();
                terminal.draw(|frame| app.render(frame))?;
                app.after_draw();
            }
            maybe_update = app.next_update() => {
                match maybe_update {
                    Some(update) => {
                        app.handle_update(update);
                    }
                    None => app.source_finished(),
                }
            }
        }
    }

    terminal.show_cursor()?;
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen, DisableMouseCapture)?;

    Ok(())
}
