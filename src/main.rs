// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blockroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blockroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Blockroute CLI entrypoint.
//!
//! By default this runs the interactive TUI and serves MCP over streamable HTTP at
//! `http://127.0.0.1:<port>/mcp`.
//!
//! Use `--mcp` to run the MCP server over stdio instead (intended for tool integrations), or one
//! of the subcommands for one-shot routing, rendering and scene generation.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use blockroute::mcp::BlockrouteMcp;
use blockroute::model::fixtures::{demo_scene, random_scene, DEFAULT_RANDOM_OBSTACLES};
use blockroute::model::scene::{DEFAULT_SCENE_HEIGHT, DEFAULT_SCENE_WIDTH};
use blockroute::model::Scene;
use blockroute::render::{render_scene_unicode, RenderOptions, DEFAULT_CELL_HEIGHT, DEFAULT_CELL_WIDTH};
use blockroute::routing::{plan_route, RouteConfig, DEFAULT_BEND_PENALTY};
use blockroute::store::{PointJson, SceneFile, WriteDurability};
use blockroute::ui::SharedScene;
use clap::{Parser, Subcommand};
use rmcp::transport::{
    streamable_http_server::session::local::LocalSessionManager, StreamableHttpServerConfig,
    StreamableHttpService,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

const DEFAULT_MCP_HTTP_PORT: u16 = 27435;
const DEFAULT_LOG_FILTER: &str = "blockroute=info";

#[derive(Debug, Parser)]
#[command(
    name = "blockroute",
    version,
    about = "Rectilinear routing around rectangular obstacles",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Scene file to load and save (defaults to the built-in demo scene, unsaved).
    #[arg(long, value_name = "FILE")]
    scene: Option<PathBuf>,

    /// Serve MCP over stdio instead of running the TUI.
    #[arg(long)]
    mcp: bool,

    /// Port for the MCP HTTP endpoint next to the TUI (0 = ephemeral).
    #[arg(long, value_name = "PORT", conflicts_with = "mcp")]
    mcp_http_port: Option<u16>,

    /// Write logs to this file. Without it, TUI mode does not log at all.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// fsync scene writes where supported.
    #[arg(long)]
    durable_writes: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the route for a scene file.
    Route {
        #[arg(long, value_name = "FILE")]
        scene: PathBuf,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
        #[arg(long, value_name = "N", default_value_t = DEFAULT_BEND_PENALTY)]
        bend_penalty: u64,
    },
    /// Print a text rendering of a scene file and its route.
    Render {
        #[arg(long, value_name = "FILE")]
        scene: PathBuf,
        /// Overlay the routing graph.
        #[arg(long)]
        graph: bool,
        #[arg(long, value_name = "UNITS", default_value_t = DEFAULT_CELL_WIDTH)]
        cell_width: i32,
        #[arg(long, value_name = "UNITS", default_value_t = DEFAULT_CELL_HEIGHT)]
        cell_height: i32,
    },
    /// Write a random scene.
    Random {
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = DEFAULT_RANDOM_OBSTACLES)]
        count: usize,
        #[arg(long, default_value_t = DEFAULT_SCENE_WIDTH)]
        width: i32,
        #[arg(long, default_value_t = DEFAULT_SCENE_HEIGHT)]
        height: i32,
    },
}

#[derive(Debug, Serialize)]
struct RouteOutput {
    found: bool,
    length: u64,
    bends: usize,
    points: Vec<PointJson>,
    polyline: Vec<PointJson>,
}

fn init_logging(log_file: Option<&Path>, tui_mode: bool) -> Result<(), Box<dyn Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match log_file {
        Some(path) => {
            let file = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .try_init()
                .map_err(|err| err as Box<dyn Error>)?;
        }
        // The terminal belongs to the TUI.
        None if tui_mode => {}
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|err| err as Box<dyn Error>)?;
        }
    }
    Ok(())
}

fn open_scene_file(path: PathBuf, durable_writes: bool) -> SceneFile {
    let durability = if durable_writes {
        WriteDurability::Durable
    } else {
        WriteDurability::BestEffort
    };
    SceneFile::new(path).with_durability(durability)
}

fn print_route(scene: &Scene, bend_penalty: u64, json: bool) -> Result<(), Box<dyn Error>> {
    let plan = plan_route(scene, &RouteConfig::with_bend_penalty(bend_penalty));
    let route = &plan.route;

    if json {
        let output = RouteOutput {
            found: !route.is_empty(),
            length: route.length(),
            bends: route.bends(),
            points: route.points().iter().copied().map(PointJson::from).collect(),
            polyline: route.polyline().into_iter().map(PointJson::from).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if route.is_empty() {
        println!("no route from {} to {}", scene.start(), scene.end());
        return Ok(());
    }
    println!("length {} bends {}", route.length(), route.bends());
    let polyline = route
        .polyline()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    println!("{}", polyline.join(" -> "));
    Ok(())
}

fn run_tui_with_mcp_http(
    scene_file: Option<SceneFile>,
    mcp_http_port: u16,
) -> Result<(), Box<dyn Error>> {
    let scene = match scene_file.as_ref() {
        Some(file) => file.load_or_init()?,
        None => demo_scene(),
    };
    let shared = SharedScene::new(scene).into_handle();
    let mcp = match scene_file.clone() {
        Some(file) => BlockrouteMcp::new_shared(shared.clone()).with_scene_file(file),
        None => BlockrouteMcp::new_shared(shared.clone()),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", mcp_http_port)).await?;
        tracing::info!(addr = %listener.local_addr()?, "MCP HTTP server listening on /mcp");

        let config = StreamableHttpServerConfig {
            stateful_mode: true,
            ..StreamableHttpServerConfig::default()
        };
        let shutdown_token = config.cancellation_token.clone();
        let server_shutdown = shutdown_token.clone();

        let session_manager = Arc::new(LocalSessionManager::default());
        let mcp_service = {
            let mcp = mcp.clone();
            StreamableHttpService::new(move || Ok(mcp.clone()), session_manager, config)
        };

        let router = Router::new().nest_service("/mcp", mcp_service);
        let server_handle = tokio::spawn(async move {
            let serve = axum::serve(listener, router).with_graceful_shutdown(async move {
                server_shutdown.cancelled().await;
            });
            if let Err(err) = serve.await {
                tracing::error!(error = %err, "MCP HTTP server error");
            }
        });

        let tui_join = tokio::task::spawn_blocking(move || {
            blockroute::tui::run_with_shared_scene(shared, scene_file).map_err(|err| err.to_string())
        })
        .await;

        shutdown_token.cancel();
        let _ = server_handle.await;

        let tui_result = tui_join.map_err(|err| -> Box<dyn Error> { Box::new(err) })?;
        tui_result.map_err(|err| Box::new(std::io::Error::other(err)) as Box<dyn Error>)?;
        Ok::<(), Box<dyn Error>>(())
    })
}

fn main() {
    let cli = Cli::parse();

    let result = (|| -> Result<(), Box<dyn Error>> {
        let tui_mode = cli.command.is_none() && !cli.mcp;
        init_logging(cli.log_file.as_deref(), tui_mode)?;

        match cli.command {
            Some(Command::Route {
                scene,
                json,
                bend_penalty,
            }) => {
                let scene = SceneFile::new(scene).load()?;
                print_route(&scene, bend_penalty, json)
            }
            Some(Command::Render {
                scene,
                graph,
                cell_width,
                cell_height,
            }) => {
                let scene = SceneFile::new(scene).load()?;
                let plan = plan_route(&scene, &RouteConfig::default());
                let options = RenderOptions {
                    cell_width,
                    cell_height,
                    show_graph: graph,
                };
                println!("{}", render_scene_unicode(&scene, &plan, options)?);
                Ok(())
            }
            Some(Command::Random {
                out,
                seed,
                count,
                width,
                height,
            }) => {
                let seed = seed.unwrap_or_else(rand::random);
                let scene = random_scene(width, height, count, seed);
                open_scene_file(out, cli.durable_writes).save(&scene)?;
                tracing::info!(seed, count, "random scene written");
                Ok(())
            }
            None if cli.mcp => {
                let mcp = match cli.scene {
                    Some(path) => {
                        let file = open_scene_file(path, cli.durable_writes);
                        BlockrouteMcp::new(file.load_or_init()?).with_scene_file(file)
                    }
                    None => BlockrouteMcp::new(demo_scene()),
                };
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()?;
                tracing::info!("serving MCP over stdio");
                runtime.block_on(mcp.serve_stdio())?;
                Ok(())
            }
            None => {
                let scene_file = cli
                    .scene
                    .map(|path| open_scene_file(path, cli.durable_writes));
                run_tui_with_mcp_http(
                    scene_file,
                    cli.mcp_http_port.unwrap_or(DEFAULT_MCP_HTTP_PORT),
                )
            }
        }
    })();

    if let Err(err) = result {
        eprintln!("blockroute: {err}");
        std::process::exit(1);
    }
}
