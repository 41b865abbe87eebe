use anyhow::Context;
use clap::Parser;
use config::DashboardConfig;
use disastercore::api::{DetectResponse, DisasterRecord, HttpBackend};
use disastercore::feed::{FeedRenderer, LayerKind, Marker, TimestampFormatter};
use disastercore::prelude::{DisasterApi, TransportResult};
use disastercore::telemetry::MetricsRecorder;
use disastercore::{RefreshStatus, SubmissionHelper, SubmissionOutcome};
use iced::{
    time,
    widget::{button, column, row, scrollable, text, text_input, Canvas, Column, Container},
    Alignment, Color, Element, Length, Subscription, Task, Theme,
};
use log::info;
use map::MarkerMap;
use std::path::PathBuf;
use std::sync::Arc;

mod config;
mod map;

const ERROR_COLOR: Color = Color::from_rgb(0.86, 0.21, 0.27);

#[derive(Parser)]
#[command(author, version, about = "Map dashboard for the disaster feed")]
struct Args {
    /// Load dashboard settings from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Backend base URL, overrides the config file
    #[arg(long)]
    backend: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if let Some(path) = args.config {
        DashboardConfig::load(path)?
    } else {
        DashboardConfig::default()
    }
    .with_backend(args.backend);
    let backend = HttpBackend::new(&config.backend_url)
        .with_context(|| format!("configuring backend {}", config.backend_url))?;
    info!("dashboard using backend {}", backend.base_url());

    iced::application(
        move || Dashboard::boot(config.clone(), backend.clone()),
        Dashboard::update,
        Dashboard::view,
    )
    .title(application_title)
    .subscription(application_subscription)
    .theme(application_theme)
    .run()?;
    Ok(())
}

fn application_title(_: &Dashboard) -> String {
    "Disaster Watch".into()
}

fn application_subscription(state: &Dashboard) -> Subscription<Message> {
    match state.config.refresh_interval() {
        Some(interval) => time::every(interval).map(|_| Message::Refresh),
        None => Subscription::none(),
    }
}

fn application_theme(_: &Dashboard) -> Theme {
    Theme::Dark
}

struct Dashboard {
    config: DashboardConfig,
    backend: HttpBackend,
    feed: FeedRenderer,
    submitter: SubmissionHelper,
    metrics: Arc<MetricsRecorder>,
    image_url: String,
    results: Option<SubmissionOutcome>,
    selected: Option<(LayerKind, usize)>,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    Refresh,
    FeedFetched(TransportResult<Vec<DisasterRecord>>),
    /// `flood-toggle` / `fire-toggle`
    ToggleLayer(LayerKind),
    /// `image-url`
    ImageUrlChanged(String),
    /// `analyze-btn`
    Analyze,
    Classified(String, TransportResult<DetectResponse>),
    MarkerSelected(LayerKind, usize),
}

impl Dashboard {
    fn boot(config: DashboardConfig, backend: HttpBackend) -> (Self, Task<Message>) {
        let metrics = Arc::new(MetricsRecorder::new());
        let formatter = TimestampFormatter::new(config.display_zone);
        let dashboard = Dashboard {
            feed: FeedRenderer::with_metrics(formatter, metrics.clone()),
            submitter: SubmissionHelper::new(metrics.clone()),
            metrics,
            config,
            backend,
            image_url: String::new(),
            results: None,
            selected: None,
            status: "Loading disasters...".into(),
            history: Vec::new(),
        };
        let initial_load = dashboard.fetch_feed();
        (dashboard, initial_load)
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Refresh => state.fetch_feed(),
            Message::FeedFetched(fetched) => {
                state.on_feed_fetched(fetched);
                Task::none()
            }
            Message::ToggleLayer(kind) => {
                state.on_toggle(kind);
                Task::none()
            }
            Message::ImageUrlChanged(value) => {
                state.image_url = value;
                Task::none()
            }
            Message::Analyze => state.on_analyze(),
            Message::Classified(image_url, reply) => state.on_classified(image_url, reply),
            Message::MarkerSelected(kind, idx) => {
                state.selected = Some((kind, idx));
                Task::none()
            }
        }
    }

    fn fetch_feed(&self) -> Task<Message> {
        let backend = self.backend.clone();
        Task::perform(
            async move { backend.list_disasters().await },
            Message::FeedFetched,
        )
    }

    fn on_feed_fetched(&mut self, fetched: TransportResult<Vec<DisasterRecord>>) {
        match self.feed.apply(fetched) {
            RefreshStatus::Applied { markers } => {
                // indices are stale after a full replace
                self.selected = None;
                self.status = format!("Loaded {markers} disaster(s)");
                self.push_history(format!("Feed refreshed: {markers} marker(s)"));
            }
            RefreshStatus::Failed(err) => {
                self.status = format!("Feed error: {err}");
                self.push_history(format!("Feed refresh failed: {err}"));
            }
        }
    }

    fn on_toggle(&mut self, kind: LayerKind) {
        self.feed.toggle(kind);
        if matches!(self.selected, Some((selected, _)) if selected == kind) {
            self.selected = None;
        }
    }

    fn on_analyze(&mut self) -> Task<Message> {
        let image_url = match self.submitter.prepare(&self.image_url) {
            Ok(image_url) => image_url,
            Err(rejected) => {
                self.results = Some(rejected);
                return Task::none();
            }
        };
        self.status = "Analyzing image...".into();
        let backend = self.backend.clone();
        Task::perform(
            async move {
                let reply = backend.classify(&image_url).await;
                (image_url, reply)
            },
            |(image_url, reply)| Message::Classified(image_url, reply),
        )
    }

    fn on_classified(
        &mut self,
        image_url: String,
        reply: TransportResult<DetectResponse>,
    ) -> Task<Message> {
        let outcome = self.submitter.interpret(image_url, reply);
        self.push_history(match &outcome {
            SubmissionOutcome::Classified(result) => {
                format!("Classified {} as {}", result.image_url, result.category)
            }
            other => other.lines().join(" "),
        });
        let follow_up = if outcome.triggers_refresh() {
            self.fetch_feed()
        } else {
            Task::none()
        };
        self.results = Some(outcome);
        follow_up
    }

    fn selected_marker(&self) -> Option<&Marker> {
        self.selected
            .and_then(|(kind, idx)| self.feed.layers().get(kind).markers().get(idx))
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let layers = state.feed.layers();

        let toggles = row![
            layer_toggle(LayerKind::Flood, layers.get(LayerKind::Flood).is_control_active()),
            layer_toggle(LayerKind::Fire, layers.get(LayerKind::Fire).is_control_active()),
        ]
        .spacing(8);

        let results_panel = match &state.results {
            None => Column::new().push(text("Submit an image URL to classify it").size(12)),
            Some(outcome) => {
                let is_error = outcome.is_error();
                outcome
                    .lines()
                    .into_iter()
                    .fold(Column::new().spacing(4), |col, line| {
                        let line = text(line).size(14);
                        col.push(if is_error { line.color(ERROR_COLOR) } else { line })
                    })
            }
        };

        let metrics = state.metrics.snapshot();
        let counters = text(format!(
            "refreshes {} | failed {} | submitted {} | rejected {}",
            metrics.refreshes, metrics.refresh_failures, metrics.submissions, metrics.rejected_inputs
        ))
        .size(12);

        let history_list = if state.history.is_empty() {
            Column::new().push(text("No activity yet").size(12))
        } else {
            state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let control_column = column![
            text("Disaster Watch").size(26),
            text("Layers").size(16),
            toggles,
            text("Analyze image").size(16),
            text_input("https://example.com/image.jpg", &state.image_url)
                .on_input(Message::ImageUrlChanged)
                .on_submit(Message::Analyze)
                .padding(6),
            button("Analyze").on_press(Message::Analyze).padding(10),
            Container::new(results_panel).padding(6),
            text(&state.status).size(14),
            counters,
            text("Activity log").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(140.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(360.0));

        let map_canvas = Canvas::new(MarkerMap::new(&state.config.map, layers, state.selected))
            .width(Length::Fill)
            .height(Length::Fixed(420.0));

        let marker_entries = layers.visible_markers().fold(
            Column::new().spacing(4),
            |col, (kind, idx, marker)| {
                col.push(
                    button(
                        text(format!(
                            "{} {} at ({:.3}, {:.3})",
                            marker.popup.title,
                            marker.popup.confidence,
                            marker.position.latitude,
                            marker.position.longitude
                        ))
                        .size(12),
                    )
                    .on_press(Message::MarkerSelected(kind, idx))
                    .style(button::text)
                    .width(Length::Fill),
                )
            },
        );
        let marker_list = if layers.visible_markers().next().is_none() {
            Column::new().push(text("No disasters to show").size(12))
        } else {
            marker_entries
        };

        let popup = match state.selected_marker() {
            Some(marker) => marker
                .popup
                .lines()
                .into_iter()
                .fold(Column::new().spacing(2), |col, line| col.push(text(line).size(14))),
            None => Column::new().push(text("Select a marker to see details").size(12)),
        };

        let map_column = column![
            text("Map").size(26),
            map_canvas,
            text("Details").size(16),
            Container::new(popup).padding(6),
            text("Markers").size(16),
            Container::new(scrollable(marker_list).height(Length::Fixed(160.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fill);

        let layout = row![control_column, map_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

fn layer_toggle(kind: LayerKind, active: bool) -> Element<'static, Message> {
    button(text(kind.to_string()))
        .on_press(Message::ToggleLayer(kind))
        .padding(8)
        .style(move |theme: &Theme, status| {
            if active {
                button::primary(theme, status)
            } else {
                button::secondary(theme, status)
            }
        })
        .into()
}
