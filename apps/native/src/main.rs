mod ui;
mod update;

use std::env;
use std::time::Duration;

use anyhow::Context;
use foliocore_config::{settings_path, Settings, Theme as FolioTheme};
use foliocore_index::SearchIndex;
use foliod::{AppService, SearchIndexAggregator};
use iced::keyboard::{key, Event as KeyboardEvent, Key};
use iced::{event, widget, window, Event, Size, Subscription, Task, Theme};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ui::view;
use update::update;

const WINDOW_WIDTH: f32 = 980.0;
const WINDOW_HEIGHT: f32 = 640.0;
const POLL_INTERVAL: Duration = Duration::from_millis(50);

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut settings = Settings::load_or_default(&settings_path());
    settings.apply_env_overrides();

    // Owned here so it outlives the iced event loop and is dropped outside it.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("failed to start catalog runtime")?;
    let handle = runtime.handle().clone();

    iced::application(
        move || App::boot(&handle, settings.clone()),
        update,
        view,
    )
    .title("Folio")
    .theme(theme)
    .window(window_settings())
    .subscription(subscription)
    .run()?;

    Ok(())
}

fn init_tracing() {
    let default_filter = if env::var("FOLIO_DEBUG").ok().as_deref() == Some("1") {
        "debug"
    } else {
        "warn,folio=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();
}

#[derive(Debug, Clone)]
pub(crate) enum Message {
    PollIndex,
    Keyboard(KeyboardEvent),
    ToggleSearch,
    CloseSearch,
    QueryChanged(String),
    SubmitSearch,
    ClearQuery,
    ChoosePage(String),
    ChooseEntry(String),
    Navigate(String),
    Back,
    AddToCart(String),
    SetQuantity(String, i64),
    RemoveLine(String),
}

pub(crate) struct App {
    service: AppService,
    index: SearchIndex,
    index_rx: watch::Receiver<SearchIndex>,
    _aggregator: Option<SearchIndexAggregator>,
    search_input_id: widget::Id,
    theme: FolioTheme,
}

impl App {
    fn boot(runtime: &Handle, settings: Settings) -> (Self, Task<Message>) {
        let theme = settings.theme;
        let service = AppService::new(settings);

        let (aggregator, index_rx) = match service.mount_index(runtime) {
            Ok(aggregator) => {
                let rx = aggregator.subscribe();
                (Some(aggregator), rx)
            }
            Err(err) => {
                error!(error = %err, "catalog client unavailable, serving bundled data");
                let (_tx, rx) = watch::channel(SearchIndex::bootstrap());
                (None, rx)
            }
        };
        let index = index_rx.borrow().clone();
        info!(
            pages = index.pages().len(),
            entries = index.catalog().len(),
            "search index ready"
        );

        let app = Self {
            service,
            index,
            index_rx,
            _aggregator: aggregator,
            search_input_id: widget::Id::new("search-input"),
            theme,
        };
        (app, Task::none())
    }

    /// Pulls a newer index snapshot when the aggregator published one.
    fn refresh_index(&mut self) {
        if self.index_rx.has_changed().unwrap_or(false) {
            self.index = self.index_rx.borrow_and_update().clone();
        }
    }
}

fn theme(app: &App) -> Theme {
    match app.theme {
        FolioTheme::GalleryDark => Theme::TokyoNight,
        FolioTheme::GalleryLight => Theme::Light,
    }
}

fn subscription(app: &App) -> Subscription<Message> {
    let mut subs = vec![event::listen_with(keyboard_message)];

    if app.index.is_loading() {
        subs.push(iced::time::every(POLL_INTERVAL).map(|_| Message::PollIndex));
    }

    Subscription::batch(subs)
}

fn keyboard_message(event: Event, status: event::Status, _window: window::Id) -> Option<Message> {
    let Event::Keyboard(keyboard_event) = event else {
        return None;
    };
    let KeyboardEvent::KeyPressed { key, .. } = &keyboard_event else {
        return None;
    };

    forwards_key(key, status).then_some(Message::Keyboard(keyboard_event))
}

/// The query input captures Escape, which must still close the overlay. Any other
/// key a widget consumed stays with that widget.
fn forwards_key(key: &Key, status: event::Status) -> bool {
    status == event::Status::Ignored || *key == Key::Named(key::Named::Escape)
}

fn window_settings() -> window::Settings {
    let mut settings = window::Settings::default();
    settings.size = Size::new(WINDOW_WIDTH, WINDOW_HEIGHT);
    settings.min_size = Some(Size::new(520.0, 360.0));
    settings
}
