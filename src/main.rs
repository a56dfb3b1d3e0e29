//! Pokemon catalog TUI

use std::cell::RefCell;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Mutex;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{layout::Rect, Frame, Terminal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokedex::action::Action;
use pokedex::api::{self, CatalogSource};
use pokedex::components::{AppShell, AppShellProps, Component};
use pokedex::effect::Effect;
use pokedex::loader;
use pokedex::reducer::reducer;
use pokedex::route::Route;
use pokedex::sprite;
use pokedex::sprite_backend::{self, SpriteBackend};
use pokedex::state::AppState;

/// Pokemon catalog browser for the terminal
#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Browse the PokeAPI catalog with incremental loading and search")]
struct Args {
    /// Base URL of the catalog API
    #[arg(long, default_value = api::DEFAULT_API_BASE)]
    api_base: String,

    /// Route to open on start: "/" or "/pokemon/<id>"
    #[arg(long, default_value = "/")]
    route: Route,

    /// Write tracing output to this file (RUST_LOG filters, default info)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum CatalogComponentId {
    Listing,
    Search,
    Detail,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum CatalogContext {
    Listing,
    Search,
    Detail,
}

impl EventRoutingState<CatalogComponentId, CatalogContext> for AppState {
    fn focused(&self) -> Option<CatalogComponentId> {
        match self.route {
            Route::Detail { .. } => Some(CatalogComponentId::Detail),
            Route::Listing if self.listing.search.active => Some(CatalogComponentId::Search),
            Route::Listing => Some(CatalogComponentId::Listing),
        }
    }

    fn modal(&self) -> Option<CatalogComponentId> {
        if self.route == Route::Listing && self.listing.search.active {
            Some(CatalogComponentId::Search)
        } else {
            None
        }
    }

    fn binding_context(&self, id: CatalogComponentId) -> CatalogContext {
        match id {
            CatalogComponentId::Listing => CatalogContext::Listing,
            CatalogComponentId::Search => CatalogContext::Search,
            CatalogComponentId::Detail => CatalogContext::Detail,
        }
    }

    fn default_context(&self) -> CatalogContext {
        CatalogContext::Listing
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        api_base,
        route,
        log_file,
        debug: debug_args,
    } = Args::parse();

    if let Some(path) = log_file.as_deref() {
        init_logging(path)?;
    }
    if !api::configure(&api_base) {
        tracing::warn!(api_base = %api_base, "catalog client already configured");
    }
    tracing::info!(api_base = %api_base, route = %route.path(), "starting");

    let debug = DebugSession::new(debug_args);

    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(route))
        })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = SpriteBackend::new(stdout, sprite_backend::sprite_registry());
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    tracing::info!("exiting");
    Ok(())
}

/// The terminal belongs to the UI, so events only go to a file.
fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

struct CatalogUi {
    shell: AppShell,
}

impl CatalogUi {
    fn new() -> Self {
        Self {
            shell: AppShell::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<CatalogComponentId>,
    ) {
        let body = AppShell::layout(area).body;
        event_ctx.component_areas.clear();
        if let Some(id) = state.focused() {
            event_ctx.set_component_area(id, body);
        }

        let props = AppShellProps {
            state,
            is_focused: render_ctx.is_focused(),
        };
        self.shell.render(frame, area, props);
    }

    fn handle_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let props = AppShellProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self.shell.handle_event(event, props).into_iter().collect();
        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    }
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(CatalogUi::new()));
    let mut bus: EventBus<AppState, Action, CatalogComponentId, CatalogContext> =
        EventBus::new();
    let keybindings: Keybindings<CatalogContext> = Keybindings::new();

    for id in [
        CatalogComponentId::Listing,
        CatalogComponentId::Search,
        CatalogComponentId::Detail,
    ] {
        let ui_handle = Rc::clone(&ui);
        bus.register(id, move |event, state| {
            ui_handle.borrow_mut().handle_event(&event.kind, state)
        });
    }

    bus.register_global(|event, state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        EventKind::Key(key) => match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                HandlerResponse::action(Action::Quit)
            }
            KeyCode::Char('q') if !state.listing.search.active => {
                HandlerResponse::action(Action::Quit)
            }
            _ => HandlerResponse::ignored(),
        },
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |_runtime| {},
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::LoadPage { generation, offset } => {
            tracing::debug!(generation, offset, "spawning page load");
            ctx.tasks().spawn(TaskKey::new("page"), async move {
                match loader::load_page(api::client(), offset).await {
                    Ok(page) => Action::ListPageDidLoad {
                        generation,
                        offset: page.offset,
                        summary_count: page.summary_count,
                        entries: page.entries,
                    },
                    Err(error) => {
                        tracing::warn!(generation, offset, %error, "page load failed");
                        Action::ListPageDidError {
                            generation,
                            offset,
                            error: error.to_string(),
                        }
                    }
                }
            });
        }
        Effect::LoadDetail { generation, id } => {
            tracing::debug!(generation, id = %id, "spawning detail load");
            ctx.tasks().spawn(TaskKey::new("detail"), async move {
                match loader::load_detail(api::client(), &id).await {
                    Ok(detail) => Action::DetailDidLoad { generation, detail },
                    Err(error) => {
                        tracing::warn!(generation, id = %id, %error, "detail load failed");
                        Action::DetailDidError {
                            generation,
                            error: error.to_string(),
                        }
                    }
                }
            });
        }
        Effect::LoadImage { url } => {
            ctx.tasks().spawn(TaskKey::new("image"), async move {
                let decoded = match api::client().fetch_bytes(&url).await {
                    Ok(bytes) => sprite::decode_sprite(&bytes),
                    Err(error) => Err(error.to_string()),
                };
                match decoded {
                    Ok(sprite) => Action::ImageDidLoad { url, sprite },
                    Err(error) => {
                        tracing::warn!(url = %url, error = %error, "image load failed");
                        Action::ImageDidError { url, error }
                    }
                }
            });
        }
    }
}
