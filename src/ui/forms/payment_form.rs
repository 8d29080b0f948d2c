//! Payment form rendering

use super::field_renderer::{draw_field, draw_help_text};
use crate::platform::SUBMIT_SHORTCUT;
use crate::state::{PaymentField, PaymentForm};
use crate::ui::components::{
    render_banner, render_button, BannerKind, BANNER_HEIGHT, BUTTON_HEIGHT,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const FORM_WIDTH: u16 = 52;
const FIELD_HEIGHT: u16 = 3;

/// Draw the card entry form centered in `area`
pub fn draw_payment_form(frame: &mut Frame, area: Rect, form: &PaymentForm) {
    let error = form.error().map(|e| e.to_string());
    let success = form.is_success();

    let mut constraints = vec![Constraint::Length(2)]; // Heading
    if error.is_some() {
        constraints.push(Constraint::Length(BANNER_HEIGHT));
    }
    if success {
        constraints.push(Constraint::Length(BANNER_HEIGHT));
    }
    constraints.extend([
        Constraint::Length(FIELD_HEIGHT),  // Cardholder name
        Constraint::Length(FIELD_HEIGHT),  // Card number
        Constraint::Length(FIELD_HEIGHT),  // Expiry + CVV
        Constraint::Length(BUTTON_HEIGHT), // Submit
        Constraint::Length(1),             // Help text
    ]);

    // Borders + margin around the stacked rows
    let content_height: u16 = constraints
        .iter()
        .map(|c| match c {
            Constraint::Length(n) => *n,
            _ => 0,
        })
        .sum();
    let panel = centered(area, FORM_WIDTH, content_height + 4);

    let block = Block::default()
        .title(" Payment ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, panel);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(panel);
    let mut rows = chunks.iter().copied();
    let mut next_row = || rows.next().unwrap_or_default();

    let heading = Paragraph::new("Enter Card Details")
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(heading, next_row());

    if let Some(message) = &error {
        render_banner(frame, next_row(), BannerKind::Error, message);
    }
    if success {
        render_banner(frame, next_row(), BannerKind::Success, "Payment successful!");
    }

    let is_active = |field: PaymentField| form.active_payment_field() == Some(field);

    draw_field(frame, next_row(), &form.draft.name, is_active(PaymentField::Name));
    draw_field(
        frame,
        next_row(),
        &form.draft.card_number,
        is_active(PaymentField::CardNumber),
    );

    let split = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(next_row());
    draw_field(frame, split[0], &form.draft.expiry, is_active(PaymentField::Expiry));
    draw_field(frame, split[1], &form.draft.cvv, is_active(PaymentField::Cvv));

    render_button(
        frame,
        next_row(),
        form.submit_label(),
        form.is_submit_focused(),
        form.can_submit(),
    );

    draw_help_text(
        frame,
        next_row(),
        &format!("Tab: next field | Enter/{SUBMIT_SHORTCUT}: pay | Esc: quit"),
    );
}

/// A `width` x `height` rect centered in `area`, clamped to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}
