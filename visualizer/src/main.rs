use anyhow::Context;
use clap::Parser;
use iced::{
    mouse, time,
    widget::{
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        column, text, Container, Row,
    },
    Alignment, Color, Element, Length, Point, Rectangle, Renderer, Subscription, Task, Theme,
};
use log::{error, info};
use scopecore::math::StatsHelper;
use scopecore::net::{feed_channel, FeedReceiver, UdpReceiver};
use scopecore::processing::BufferStore;
use scopecore::telemetry::FeedMetrics;
use scopecore::ReceiverConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use status::FeedStatus;
use std::time::Duration;

mod plot;
mod status;

#[derive(Parser)]
#[command(author, version, about = "Real-time scope for UDP sample frames")]
struct Args {
    /// Load the receiver config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value = "0.0.0.0")]
    listen_address: String,
    #[arg(long, default_value_t = 12345)]
    port: u16,
    /// Samples kept per channel
    #[arg(long, default_value_t = 10_000)]
    buffer_size: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if let Some(path) = args.config {
        ReceiverConfig::load(&path)
            .with_context(|| format!("loading receiver config {}", path.display()))?
    } else {
        ReceiverConfig::from_args(&args.listen_address, args.port, args.buffer_size)
    };

    let session = match Session::open(config) {
        Ok(session) => session,
        Err(err) => {
            error!("cannot start UDP receiver: {:#}", err);
            return Err(err);
        }
    };
    let pending = Mutex::new(Some(session));

    iced::application(
        move || Visualizer::boot(pending.lock().ok().and_then(|mut slot| slot.take())),
        Visualizer::update,
        Visualizer::view,
    )
    .title(application_title)
    .subscription(application_subscription)
    .theme(application_theme)
    .window_size((800.0, 400.0))
    .run()
    .map_err(|err| anyhow::anyhow!("visualizer window failed: {err}"))
}

fn application_title(_: &Visualizer) -> String {
    "Real-Time UDP Waveform".into()
}

fn application_subscription(_: &Visualizer) -> Subscription<Message> {
    time::every(Duration::from_millis(16)).map(|_| Message::Tick)
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Dark
}

/// Receiver thread, the consumer half of its feed, and the buffers it fills.
struct Session {
    // Held so the receive loop is stopped when the window closes.
    _receiver: UdpReceiver,
    feed: FeedReceiver,
    store: BufferStore,
    metrics: Arc<FeedMetrics>,
    local_addr: SocketAddr,
}

impl Session {
    fn open(config: ReceiverConfig) -> anyhow::Result<Self> {
        let store = BufferStore::new(config.channels, config.buffer_size, 0.0)
            .context("allocating channel buffers")?;
        let mut receiver = UdpReceiver::new(config);
        let local_addr = receiver.bind().context("binding UDP listener")?;
        let (tx, feed) = feed_channel();
        receiver.start(tx).context("starting receive loop")?;
        let metrics = receiver.metrics();
        Ok(Self {
            _receiver: receiver,
            feed,
            store,
            metrics,
            local_addr,
        })
    }
}

struct Visualizer {
    session: Option<Session>,
    rms: Vec<f32>,
    feed_status: FeedStatus,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
}

impl Visualizer {
    fn boot(session: Option<Session>) -> (Self, Task<Message>) {
        let (rms, feed_status) = match session.as_ref() {
            Some(session) => (vec![0.0; session.store.channel_count()], FeedStatus::Live),
            None => (Vec::new(), FeedStatus::Unavailable),
        };

        (
            Visualizer {
                session,
                rms,
                feed_status,
            },
            Task::none(),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => {
                state.apply_pending();
                Task::none()
            }
        }
    }

    fn apply_pending(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let outcome = session.store.drain(&mut session.feed);
        if outcome.applied > 0 {
            self.rms = session
                .store
                .channels()
                .iter()
                .map(|buffer| StatsHelper::rms(buffer.iter()))
                .collect();
        }
        if self.feed_status.observe(&outcome) {
            info!("{}", self.feed_status.label());
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let Some(session) = state.session.as_ref() else {
            return Container::new(text(state.status_line()).size(16))
                .center(Length::Fill)
                .into();
        };

        let legend = (0..session.store.channel_count()).fold(
            Row::new().spacing(16),
            |legend, channel| {
                let (r, g, b) = plot::pen_color(channel);
                let rms = state.rms.get(channel).copied().unwrap_or_default();
                legend.push(
                    text(format!("{}  rms {:.2}", plot::channel_label(channel), rms))
                        .size(14)
                        .color(Color::from_rgb8(r, g, b)),
                )
            },
        );

        let scope = Canvas::new(ScopePlot {
            store: &session.store,
        })
        .width(Length::Fill)
        .height(Length::Fill);

        let layout = column![
            legend.align_y(Alignment::Center),
            scope,
            text(state.status_line()).size(12),
        ]
        .spacing(8)
        .padding(12);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn status_line(&self) -> String {
        let Some(session) = self.session.as_ref() else {
            return "Receiver unavailable".into();
        };
        status::status_line(
            session.local_addr,
            &session.metrics.snapshot(),
            &self.feed_status,
        )
    }
}

/// Draws every channel as a connected line, oldest sample at the left edge.
struct ScopePlot<'a> {
    store: &'a BufferStore,
}

impl canvas::Program<Message> for ScopePlot<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.05, 0.05, 0.05),
        );

        let range = plot::value_range(self.store);
        let axis_y = plot::project(0, 0.0, 2, range, bounds.width, bounds.height).1;
        let axis = Path::line(Point::new(0.0, axis_y), Point::new(bounds.width, axis_y));
        frame.stroke(
            &axis,
            Stroke::default()
                .with_width(1.0)
                .with_color(Color::from_rgb(0.25, 0.25, 0.3)),
        );

        let columns = bounds.width.max(1.0) as usize;
        for (channel, buffer) in self.store.channels().iter().enumerate() {
            let points = plot::decimate(buffer, columns);
            if points.len() < 2 {
                continue;
            }
            let len = buffer.len();
            let path = Path::new(|builder| {
                for (i, &(index, value)) in points.iter().enumerate() {
                    let (x, y) =
                        plot::project(index, value, len, range, bounds.width, bounds.height);
                    if i == 0 {
                        builder.move_to(Point::new(x, y));
                    } else {
                        builder.line_to(Point::new(x, y));
                    }
                }
            });

            let (r, g, b) = plot::pen_color(channel);
            frame.stroke(
                &path,
                Stroke::default()
                    .with_width(1.5)
                    .with_color(Color::from_rgb8(r, g, b)),
            );
        }

        vec![frame.into_geometry()]
    }
}
