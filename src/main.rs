use std::sync::Arc;

use canvas::doc::{ElementBody, ElementKind, Presentation, Slide};
use canvas::engine::Action;
use canvas::geometry::{Point, Viewport, to_pixels};
use canvas::input::Button;
use canvas::paint::Paint;
use canvas::validate::ElementDraft;
use clap::{Parser, Subcommand};
use slidedeck::config::{Config, ConfigError, normalize_store_url};
use slidedeck::editor::{BackgroundScope, EditError, Editor};
use slidedeck::rearrange::DropResult;
use slidedeck::store::http::HttpStore;
use slidedeck::store::{StaticToken, StoreError};
use slidedeck::sync::Synchronizer;
use url::Url;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error("invalid location: {0}")]
    Location(#[from] url::ParseError),
    #[error("presentation {0} not found")]
    PresentationNotFound(String),
    #[error("slide {slide} out of range (presentation has {count})")]
    SlideOutOfRange { slide: usize, count: usize },
    #[error("element {0} not found on this slide")]
    ElementNotFound(Uuid),
    #[error("element {0} is covered by another element at its centre")]
    ElementCovered(Uuid),
}

#[derive(Parser, Debug)]
#[command(name = "slidedeck", about = "Edit slide decks held in a remote store")]
struct Cli {
    #[arg(long, env = "SLIDEDECK_STORE_URL")]
    store_url: Option<String>,

    #[arg(long, env = "SLIDEDECK_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a slide and its elements.
    Show {
        presentation: String,
        /// 1-based slide number.
        #[arg(long)]
        slide: Option<usize>,
    },
    /// Append a blank slide.
    AddSlide { presentation: String },
    DeleteSlide {
        presentation: String,
        #[arg(long)]
        slide: usize,
    },
    /// Move a slide; both positions are 1-based.
    MoveSlide {
        presentation: String,
        #[arg(long)]
        from: usize,
        #[arg(long)]
        to: usize,
    },
    /// Set a slide background, or the presentation default when `--slide` is omitted.
    Background {
        presentation: String,
        #[arg(long)]
        slide: Option<usize>,
        /// `#RRGGBB` or `linear-gradient(to right, #FFFFFF, #000000)`.
        #[arg(long)]
        paint: Paint,
    },
    AddText {
        presentation: String,
        #[arg(long)]
        slide: usize,
        #[arg(long)]
        content: String,
        #[arg(long, default_value = "0")]
        x: String,
        #[arg(long, default_value = "0")]
        y: String,
        #[arg(long, default_value = "50")]
        width: String,
        #[arg(long, default_value = "50")]
        height: String,
        #[arg(long, default_value = "1")]
        font_size: String,
        #[arg(long, default_value = "#000000")]
        color: String,
    },
    /// Drag an element by a pixel offset measured in a `width` x `height` viewport.
    Nudge {
        presentation: String,
        #[arg(long)]
        slide: usize,
        #[arg(long)]
        element: Uuid,
        #[arg(long, allow_hyphen_values = true)]
        dx: f64,
        #[arg(long, allow_hyphen_values = true)]
        dy: f64,
        #[arg(long, default_value_t = 1600.0)]
        width: f64,
        #[arg(long, default_value_t = 900.0)]
        height: f64,
    },
}

impl Command {
    fn presentation(&self) -> &str {
        match self {
            Self::Show { presentation, .. }
            | Self::AddSlide { presentation }
            | Self::DeleteSlide { presentation, .. }
            | Self::MoveSlide { presentation, .. }
            | Self::Background { presentation, .. }
            | Self::AddText { presentation, .. }
            | Self::Nudge { presentation, .. } => presentation,
        }
    }

    /// The slide the command starts on, 1-based.
    fn slide(&self) -> Option<usize> {
        match self {
            Self::Show { slide, .. } | Self::Background { slide, .. } => *slide,
            Self::DeleteSlide { slide, .. } | Self::AddText { slide, .. } | Self::Nudge { slide, .. } => Some(*slide),
            Self::AddSlide { .. } | Self::MoveSlide { .. } => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "no .env file loaded");
    }

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(url) = &cli.store_url {
        config.store_url = normalize_store_url(url)?;
    }
    if cli.token.is_some() {
        config.token.clone_from(&cli.token);
    }

    let auth = Arc::new(StaticToken(config.token.clone()));
    let store = Arc::new(HttpStore::new(&config.store_url, auth, config.timeouts)?);
    let sync = Synchronizer::new(store, cli.command.presentation(), config.debounce);

    let mut location = Url::parse(&format!("slidedeck://deck/{}", cli.command.presentation()))?;
    if let Some(slide) = cli.command.slide() {
        location.set_query(Some(&format!("slide={slide}")));
    }
    let mut editor = Editor::open(sync, location).await?;
    let presentation = editor
        .presentation()
        .ok_or_else(|| CliError::PresentationNotFound(cli.command.presentation().to_owned()))?;
    if let Some(slide) = cli.command.slide() {
        let count = presentation.slides.len();
        if slide == 0 || slide > count {
            return Err(CliError::SlideOutOfRange { slide, count });
        }
    }

    let result = run(&mut editor, cli.command).await;
    editor.flush().await;
    for notice in editor.take_notices() {
        eprintln!("{}", notice.message);
    }
    result
}

async fn run(editor: &mut Editor, command: Command) -> Result<(), CliError> {
    match command {
        Command::Show { .. } => {
            print_slide(editor);
        }
        Command::AddSlide { .. } => {
            let id = editor.add_slide().await?;
            eprintln!("added slide {id} at position {}", editor.current_index() + 1);
        }
        Command::DeleteSlide { .. } => {
            let id = editor.delete_slide().await?;
            eprintln!("deleted slide {id}; now on slide {}", editor.current_index() + 1);
        }
        Command::MoveSlide { from, to, .. } => {
            let drop = DropResult { source: from.saturating_sub(1), destination: to.checked_sub(1) };
            if editor.rearrange(drop).await? {
                eprintln!("moved slide {from} to {to}");
            } else {
                eprintln!("nothing to move");
            }
        }
        Command::Background { slide, paint, .. } => {
            let scope = if slide.is_some() { BackgroundScope::CurrentSlide } else { BackgroundScope::Default };
            editor.set_background(scope, paint).await?;
            eprintln!("background saved");
        }
        Command::AddText { content, x, y, width, height, font_size, color, .. } => {
            let mut draft = ElementDraft::new(ElementKind::Text);
            draft.content = content;
            draft.position_x = x;
            draft.position_y = y;
            draft.size_width = width;
            draft.size_height = height;
            draft.font_size = font_size;
            draft.color = color;
            let id = editor.add_element(&draft).await?;
            println!("{id}");
        }
        Command::Nudge { element, dx, dy, width, height, .. } => {
            nudge(editor, element, dx, dy, Viewport::new(width, height))?;
            if let Some(rect) = editor.current_slide().and_then(|s| s.element(&element)).map(|e| e.rect) {
                eprintln!(
                    "element {element} now at {:.2}%, {:.2}% size {:.2}% x {:.2}%",
                    rect.position_x, rect.position_y, rect.size_width, rect.size_height
                );
            }
        }
    }
    Ok(())
}

/// Drag `element` from its centre by `(dx, dy)` through the pointer controller.
fn nudge(editor: &mut Editor, element: Uuid, dx: f64, dy: f64, viewport: Viewport) -> Result<(), CliError> {
    let rect = editor
        .current_slide()
        .and_then(|s| s.element(&element))
        .map(|e| to_pixels(&e.rect, viewport))
        .ok_or(CliError::ElementNotFound(element))?;
    let start = Point::new(rect.x + rect.w / 2.0, rect.y + rect.h / 2.0);

    editor.set_viewport(viewport);
    editor.pointer_down(start, Button::Primary);
    let grabbed = editor
        .render()
        .and_then(|scene| scene.items.iter().find(|item| item.active).map(|item| item.id));
    if grabbed != Some(element) {
        editor.pointer_leave();
        return Err(CliError::ElementCovered(element));
    }
    let end = Point::new(start.x + dx, start.y + dy);
    editor.pointer_move(end);
    let actions = editor.pointer_up(end);
    if !actions.iter().any(|a| matches!(a, Action::GeometryCommitted { .. })) {
        tracing::warn!(%element, "drag did not commit");
    }
    Ok(())
}

fn print_slide(editor: &Editor) {
    let (Some(presentation), Some(slide)) = (editor.presentation(), editor.current_slide()) else {
        return;
    };
    print_header(presentation, editor.current_index());
    print_elements(presentation, slide);
}

fn print_header(presentation: &Presentation, index: usize) {
    println!("{} ({})", presentation.name, presentation.id);
    if let Some(description) = &presentation.description {
        println!("  {description}");
    }
    println!("slide {} of {}", index + 1, presentation.slides.len());
}

fn print_elements(presentation: &Presentation, slide: &Slide) {
    let default = presentation.effective_default_background();
    println!("background: {}", slide.background(&default));
    for element in slide.paint_order() {
        let r = &element.rect;
        let summary = match &element.body {
            ElementBody::Text(t) => format!("text {:?}", t.content),
            ElementBody::Image(i) => format!("image {}", i.image_url),
            ElementBody::Video(v) => format!("video {} autoplay={}", v.video_url, v.autoplay),
            ElementBody::Code(c) => format!("code ({})", c.programming_language.as_str()),
        };
        println!(
            "  [{}] layer {} at {:.2},{:.2} size {:.2}x{:.2}  {summary}",
            element.id, element.layer, r.position_x, r.position_y, r.size_width, r.size_height
        );
    }
}
