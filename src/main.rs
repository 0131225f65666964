use iced::widget::{button, column, container, text, Column};
use iced::{Alignment, Length};
use iced::{Element, Task, Theme};

mod config;
mod device;
mod error;
mod state;
mod ui;
mod upload;

use config::Settings;
use device::{picker, CommandCamera};
use state::data::{Notice, Selection, Source, UploadOutcome};
use state::session::Session;
use ui::notice::NoticeSlot;
use upload::Uploader;

/// Main application state
struct PhotoUploader {
    /// Selected image and last upload status
    session: Session,
    /// Notice banner currently on screen
    notices: NoticeSlot,
    settings: Settings,
    uploader: Uploader,
    camera: CommandCamera,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked "Pick an image from gallery"
    PickImage,
    /// The file dialog closed
    Picked(Selection),
    /// User clicked "Take a picture"
    TakePicture,
    /// The capture command finished (errors already rendered as text)
    Captured(Result<Selection, String>),
    /// User clicked "Upload Image"
    UploadImage,
    /// The upload request completed
    UploadFinished(UploadOutcome),
    /// Notice timer fired or the user closed the banner
    DismissNotice(u64),
}

impl PhotoUploader {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let settings = Settings::from_env();
        log::info!("📤 Uploading to {}", settings.upload_endpoint);
        log::info!("📷 Captures go to {}", settings.capture_dir.display());

        let uploader = Uploader::new(&settings);
        let camera = CommandCamera::new(settings.capture_command.clone(), &settings.capture_dir);

        (
            PhotoUploader {
                session: Session::new(),
                notices: NoticeSlot::new(),
                settings,
                uploader,
                camera,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickImage => {
                log::debug!("Pick image button pressed");
                Task::perform(
                    picker::pick_image(picker::default_start_dir()),
                    Message::Picked,
                )
            }
            Message::Picked(selection) => {
                log::debug!("Image picker result: {:?}", selection);
                let notice = self.session.apply_selection(Source::Library, selection);
                self.show_notice(notice)
            }
            Message::TakePicture => {
                log::debug!("Take picture button pressed");
                let camera = self.camera.clone();
                Task::perform(
                    async move { camera.capture().await.map_err(|e| e.to_string()) },
                    Message::Captured,
                )
            }
            Message::Captured(Ok(selection)) => {
                log::debug!("Camera result: {:?}", selection);
                let notice = self.session.apply_selection(Source::Camera, selection);
                self.show_notice(notice)
            }
            Message::Captured(Err(message)) => {
                let notice = self.session.selection_failed(Source::Camera, message);
                self.show_notice(notice)
            }
            Message::UploadImage => {
                log::debug!("Upload button pressed");
                match self.session.begin_upload() {
                    Ok(image) => {
                        let uploader = self.uploader.clone();
                        Task::perform(
                            async move { uploader.upload(image).await },
                            Message::UploadFinished,
                        )
                    }
                    Err(notice) => self.show_notice(notice),
                }
            }
            Message::UploadFinished(outcome) => {
                let notice = self.session.finish_upload(outcome);
                self.show_notice(notice)
            }
            Message::DismissNotice(id) => {
                self.notices.dismiss(id);
                Task::none()
            }
        }
    }

    /// Put a notice on screen and schedule its removal
    fn show_notice(&mut self, notice: Notice) -> Task<Message> {
        let id = self.notices.show(notice);
        let duration = self.settings.notice_duration;
        Task::perform(tokio::time::sleep(duration), move |_| {
            Message::DismissNotice(id)
        })
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let mut content: Column<Message> = column![].spacing(12).align_x(Alignment::Center);

        if let Some((id, notice)) = self.notices.current() {
            content = content.push(ui::notice_banner(id, notice));
        }

        content = content
            .push(
                button("Pick an image from gallery")
                    .on_press(Message::PickImage)
                    .padding(10),
            )
            .push(
                button("Take a picture")
                    .on_press(Message::TakePicture)
                    .padding(10),
            );

        if let Some(image) = self.session.image() {
            content = content.push(ui::preview(image));
        }

        // One upload at a time
        let uploading = self.session.is_uploading();
        content = content.push(
            button("Upload Image")
                .on_press_maybe((!uploading).then_some(Message::UploadImage))
                .padding(10),
        );

        if uploading {
            content = content.push(text("Uploading...").size(14));
        }

        if !self.session.status().is_empty() {
            content = content.push(ui::status_line(self.session.status()));
        }

        container(content.padding(16))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    iced::application(
        "Photo Uploader",
        PhotoUploader::update,
        PhotoUploader::view,
    )
    .theme(PhotoUploader::theme)
    .centered()
    .run_with(PhotoUploader::new)
}
