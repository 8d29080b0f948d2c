//! UI module for rendering the TUI

mod activities;
mod components;
mod forms;
mod layout;

use crate::app::App;
use crate::state::View;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (main_area, status_area) = layout::create_layout(frame.area());

    match app.state.current_view {
        View::Payment => {
            if let Some(form) = &app.state.payment_form {
                forms::draw_payment_form(frame, main_area, form);
            }
        }
        View::Activities => activities::draw(frame, main_area, app),
    }

    layout::draw_status_bar(frame, status_area, app);
}
