/// UI building blocks for the main window
///
/// - Transient notice bookkeeping (notice.rs)
/// - Preview, status line and notice banner widgets (below)

pub mod notice;

use iced::widget::{self, button, column, container, row, text};
use iced::{Alignment, Color, Element, Length};

use crate::state::data::{ImageRef, Notice};
use crate::Message;

/// Preview is shown as a fixed square
const PREVIEW_SIZE: f32 = 200.0;

const STATUS_COLOR: Color = Color {
    r: 0.45,
    g: 0.65,
    b: 1.0,
    a: 1.0,
};

/// Thumbnail of the selected image
pub fn preview<'a>(image: &ImageRef) -> Element<'a, Message> {
    widget::image(widget::image::Handle::from_path(image.path()))
        .width(Length::Fixed(PREVIEW_SIZE))
        .height(Length::Fixed(PREVIEW_SIZE))
        .into()
}

/// Outcome of the last upload
pub fn status_line(status: &str) -> Element<'_, Message> {
    text(status).size(16).color(STATUS_COLOR).into()
}

/// Banner for the current notice, with a close button
pub fn notice_banner(id: u64, notice: &Notice) -> Element<'_, Message> {
    let mut body = column![text(&notice.title).size(18)].spacing(4);
    if let Some(detail) = &notice.body {
        body = body.push(text(detail).size(14));
    }

    let content = row![
        body.width(Length::Fill),
        button(text("✕").size(14))
            .on_press(Message::DismissNotice(id))
            .padding(4),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    container(content)
        .padding(12)
        .width(Length::Fixed(360.0))
        .style(container::rounded_box)
        .into()
}
