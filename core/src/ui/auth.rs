/// Rendering for the authentication screens
use crate::otp::{OtpStatus, OTP_LEN};
use crate::password::{self, StrengthLabel};
use crate::ui::app::{App, FormState, Screen};
use crate::validate;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, app: &App) {
    let area = f.size();
    f.render_widget(Clear, area);

    match app.screen {
        Screen::SignIn => render_form_screen(
            f,
            app,
            "Sign In",
            &app.sign_in,
            if app.sign_in.busy {
                Some("Signing in...")
            } else {
                None
            },
            &["Enter submit", "Tab next field", "^N sign up", "^F forgot password", "^C quit"],
        ),
        Screen::SignUp => render_form_screen(
            f,
            app,
            "Create Account",
            &app.sign_up,
            if app.sign_up.busy {
                Some("Creating your account...")
            } else {
                None
            },
            &["Enter submit", "Tab next field", "Esc back", "^C quit"],
        ),
        Screen::ForgotPassword => render_form_screen(
            f,
            app,
            "Forgot Password",
            &app.forgot,
            if app.forgot.busy {
                Some("Sending reset link...")
            } else if app.forgot_sent {
                Some("Check your inbox, then press Enter to continue")
            } else {
                None
            },
            &["Enter submit", "Esc back", "^C quit"],
        ),
        Screen::ResetPassword => render_form_screen(
            f,
            app,
            "Reset Password",
            &app.reset,
            None,
            &["Enter submit", "Esc back", "^C quit"],
        ),
        Screen::VerifyOtp => render_verify(f, app),
        Screen::Chat => unreachable!("chat renders through ui::chat"),
    }

    render_status(f, app, area);
}

fn render_form_screen(
    f: &mut Frame,
    app: &App,
    title: &str,
    form: &FormState,
    busy_line: Option<&str>,
    hints: &[&str],
) {
    // 3 rows per field plus an error line each, title, meter, status, hints
    let height = (form.fields.len() as u16) * 4 + 7;
    let area = centered_rect(56, height, f.size());

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut constraints: Vec<Constraint> = Vec::new();
    for _ in &form.fields {
        constraints.push(Constraint::Length(3));
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(1)); // strength meter / spacer
    constraints.push(Constraint::Length(1)); // busy line
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(1)); // hints
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, field) in form.fields.iter().enumerate() {
        let focused = form.focus == i;
        let error = validate::first_for(&form.errors, field.field());
        let border = if error.is_some() {
            Style::default().fg(Color::Red)
        } else if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let mut value = field.display();
        if focused {
            value.push('▏');
        }
        let input = Paragraph::new(value).block(
            Block::default()
                .borders(Borders::ALL)
                .title(field.label())
                .border_style(border),
        );
        f.render_widget(input, rows[i * 2]);

        if let Some(error) = error {
            let msg = Paragraph::new(error.message).style(Style::default().fg(Color::Red));
            f.render_widget(msg, rows[i * 2 + 1]);
        }
    }

    let meter_row = rows[form.fields.len() * 2];
    if app.screen == Screen::SignUp {
        render_strength_meter(f, meter_row, form.value("password"));
    }

    if let Some(line) = busy_line {
        let busy = Paragraph::new(line).style(Style::default().fg(Color::Cyan));
        f.render_widget(busy, rows[form.fields.len() * 2 + 1]);
    }

    render_hints(f, rows[rows.len() - 1], hints);
}

fn render_strength_meter(f: &mut Frame, area: Rect, password: &str) {
    if password.is_empty() {
        return;
    }
    let score = password::strength(password);
    let label = StrengthLabel::for_score(score);
    let color = match label {
        StrengthLabel::Weak => Color::Red,
        StrengthLabel::Medium => Color::Yellow,
        StrengthLabel::Strong => Color::Green,
    };
    let filled = "█".repeat(score as usize);
    let empty = "░".repeat((5 - score) as usize);
    let line = Line::from(vec![
        Span::raw("Password strength: "),
        Span::styled(filled, Style::default().fg(color)),
        Span::raw(empty),
        Span::raw(" "),
        Span::styled(label.as_str(), Style::default().fg(color)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_verify(f: &mut Frame, app: &App) {
    let area = centered_rect(56, 12, f.size());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Verify Code ")
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // prompt
            Constraint::Length(3), // slots
            Constraint::Length(1), // status
            Constraint::Length(1), // resend
            Constraint::Min(0),
            Constraint::Length(1), // hints
        ])
        .split(inner);

    let prompt = Paragraph::new("Enter the 6-digit code we sent to your email");
    f.render_widget(prompt, rows[0]);

    let otp = &app.verify.otp;
    let slot_width = 6u16;
    let total = slot_width * OTP_LEN as u16;
    let start_x = rows[1].x + rows[1].width.saturating_sub(total) / 2;
    for (i, slot) in otp.slots().iter().enumerate() {
        let slot_area = Rect {
            x: start_x + i as u16 * slot_width,
            y: rows[1].y,
            width: slot_width - 1,
            height: 3,
        };
        let border = match otp.status() {
            OtpStatus::Success => Style::default().fg(Color::Green),
            OtpStatus::Error => Style::default().fg(Color::Red),
            _ if otp.focus() == i => Style::default().fg(Color::Yellow),
            _ => Style::default().fg(Color::DarkGray),
        };
        let digit = slot.map(String::from).unwrap_or_default();
        let cell = Paragraph::new(digit)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(border));
        f.render_widget(cell, slot_area);
    }

    let (status_text, status_color) = match otp.status() {
        OtpStatus::Idle => ("", Color::White),
        OtpStatus::Verifying => ("Verifying...", Color::Cyan),
        OtpStatus::Success => ("✓ Code verified", Color::Green),
        OtpStatus::Error => ("✗ Invalid code", Color::Red),
    };
    let status = Paragraph::new(status_text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(status_color));
    f.render_widget(status, rows[2]);

    let resend_text = if otp.can_resend() {
        "Press r to resend the code".to_string()
    } else {
        format!("Resend available in {}s", otp.resend_remaining())
    };
    let resend = Paragraph::new(resend_text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(resend, rows[3]);

    render_hints(f, rows[rows.len() - 1], &["Enter verify", "Esc back", "^C quit"]);
}

fn render_hints(f: &mut Frame, area: Rect, hints: &[&str]) {
    let text = hints.join("  ·  ");
    let line = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    f.render_widget(line, area);
}

pub(crate) fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let Some(status) = &app.status else {
        return;
    };
    let color = if status.error { Color::Red } else { Color::Green };
    let line = Paragraph::new(status.text.as_str())
        .alignment(Alignment::Center)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD));
    let bottom = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };
    f.render_widget(line, bottom);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
