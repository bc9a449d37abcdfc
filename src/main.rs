//! DermAI - 皮肤病图片分类 CLI
//!
//! - predict <IMAGE>: 运行一次预测周期并输出报告
//! - report: 输出上次持久化的报告

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};

use dermai::application::{CycleError, PredictionStore, RunPredictionCycle, StoreConfig};
use dermai::config::{load_config_from_path, print_config, AppConfig};
use dermai::domain::diagnosis::{ImageHandle, ImageUpload};
use dermai::infrastructure::adapters::{HttpAnalyticsClient, HttpAnalyticsClientConfig};
use dermai::infrastructure::events::{StoreEvent, StoreEventPublisher};
use dermai::infrastructure::persistence::sled::{SledStateConfig, SledStateStorage};
use dermai::presentation::{render_report, results_view, ResultsView};

#[derive(Parser)]
#[command(name = "dermai", version, about = "AI-assisted skin condition analysis")]
struct Cli {
    /// 配置文件路径（默认搜索 config.toml / config.local.toml）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 上传图片并生成报告
    Predict {
        /// PNG / JPG / WEBP 图片
        image: PathBuf,
    },
    /// 显示上次的报告
    Report,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config_from_path(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志（输出到 stderr，stdout 留给报告）
    let log_filter = format!("{},dermai={}", config.log.level, config.log.level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    print_config(&config);

    let store = build_store(&config).await?;
    store.rehydrate().await?;

    let exit_code = match cli.command {
        Command::Predict { image } => predict(&store, &config, &image).await,
        Command::Report => report(&store).await,
    };

    store.shutdown().await?;
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<PredictionStore>> {
    // 确保数据目录存在
    if let Some(parent) = config.storage.path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let client_config = HttpAnalyticsClientConfig {
        base_url: config.api.base_url.clone(),
        prediction_path: config.api.prediction_path.clone(),
        details_path: config.api.details_path.clone(),
        image_field: config.api.image_field.clone(),
        timeout_secs: config.api.timeout_secs,
    };
    let client = Arc::new(HttpAnalyticsClient::new(client_config)?);

    let storage = SledStateStorage::new(&SledStateConfig {
        db_path: config.storage.path.to_string_lossy().to_string(),
        key: config.storage.key.clone(),
    })?
    .arc();

    let store_config = StoreConfig {
        concurrency: config.cycle.concurrency,
    };

    Ok(PredictionStore::new(
        store_config,
        client.clone(),
        client,
        storage,
        StoreEventPublisher::new().arc(),
    )
    .arc())
}

async fn predict(store: &PredictionStore, config: &AppConfig, image: &Path) -> i32 {
    let upload = match ImageUpload::from_path(image, config.upload.max_size_bytes).await {
        Ok(upload) => upload,
        Err(e) => {
            eprintln!("Invalid image: {}", e);
            return 2;
        }
    };
    let preview = ImageHandle::from_path(image).await;

    // 进度输出跟随 store 事件
    let mut events = store.subscribe();
    let progress = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                StoreEvent::CycleStarted { .. } => eprintln!("Analyzing..."),
                StoreEvent::CycleSucceeded { .. } | StoreEvent::CycleFailed { .. } => break,
                StoreEvent::StateRehydrated { .. } => {}
            }
        }
    });

    let outcome = store
        .run_prediction_cycle(RunPredictionCycle { upload, preview })
        .await;
    match &outcome {
        // 被拒绝的周期不发布事件
        Err(CycleError::CycleInProgress) => progress.abort(),
        _ => {
            let _ = progress.await;
        }
    }

    match outcome {
        Ok(outcome) => {
            tracing::debug!(cycle_id = %outcome.cycle_id, route = %outcome.navigate_to, "Navigating");
            println!("{}", render_report(&outcome.result));
            0
        }
        Err(e) => {
            eprintln!("Prediction Failed: {}", e);
            1
        }
    }
}

async fn report(store: &PredictionStore) -> i32 {
    let state = store.snapshot().await;
    match results_view(&state) {
        ResultsView::Report(result) => {
            println!("{}", render_report(result));
            0
        }
        ResultsView::Redirect(route) => {
            eprintln!(
                "No prediction result yet ({}). Run `dermai predict <IMAGE>` first.",
                route
            );
            1
        }
    }
}
