use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{GraphPanel, MessageList, TitleBar};
use crate::tui::{APP_TITLE, TuiState};

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Paragraph, Wrap};

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};

    let area = frame.area();
    let graph_height = match (&app.diagram, tui.show_diagram) {
        (Some(diagram), true) => GraphPanel::new(diagram).height(),
        _ => 0,
    };
    // The halted view already shows the error in its main area
    let notice_height = if app.error.is_some() && !app.is_halted() { 1 } else { 0 };
    let input_height = tui.input_box.calculate_height(area.width);

    let layout = Layout::vertical([
        Length(1),
        Length(graph_height),
        Min(0),
        Length(notice_height),
        Length(input_height),
    ]);
    let [title_area, graph_area, main_area, notice_area, input_area] = layout.areas(area);

    TitleBar::new(
        APP_TITLE,
        app.model_name(),
        &app.status_message,
        tui.message_list.has_unseen_content(),
    )
    .render(frame, title_area);

    if graph_height > 0
        && let Some(diagram) = &app.diagram
    {
        GraphPanel::new(diagram).render(frame, graph_area);
    }

    match (&app.error, app.is_halted()) {
        (Some(error_msg), true) => draw_error_view(frame, main_area, error_msg),
        _ => MessageList::new(&mut tui.message_list, app.transcript()).render(frame, main_area),
    }

    if notice_height > 0
        && let Some(error_msg) = &app.error
    {
        let notice = Paragraph::new(error_msg.as_str()).style(Style::default().fg(Color::Red));
        frame.render_widget(notice, notice_area);
    }

    tui.input_box.enabled = !app.is_loading && !app.is_halted();
    tui.input_box.render(frame, input_area);
}

fn draw_error_view(frame: &mut Frame, area: Rect, error_msg: &str) {
    let text = format!("{error_msg}\n\nPress Esc or Ctrl+C to quit.");
    let error_paragraph = Paragraph::new(text)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Red))
                .title("ERROR"),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(error_paragraph, area);
}
