//! coinfeed 수집기 CLI.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use coinfeed_collector::modules::{IngestionCycle, Scheduler};
use coinfeed_collector::CollectorConfig;
use coinfeed_core::logging::{init_logging, LogConfig};
use coinfeed_data::{MemoryStore, RedisStore, SharedStore};
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "coinfeed-collector")]
#[command(about = "Coinfeed market data collector", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// 사이클 한 번 실행 후 종료
    RunOnce {
        /// Redis 대신 메모리 저장소 사용 (upstream 점검용)
        #[arg(long)]
        memory_store: bool,
    },

    /// 데몬 모드: REFRESH_RATE 주기로 사이클 반복
    Daemon,

    /// 설정, coin list, secret만 검증하고 종료
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 로깅 초기화
    init_logging(LogConfig::new(&cli.log_level).with_env_format())?;

    tracing::info!("Coinfeed Collector 시작");

    // 설정 로드
    let config = CollectorConfig::from_env()?;
    tracing::debug!(
        redis_url = %config.redis.url,
        refresh_rate_secs = config.schedule.refresh_rate_secs,
        concurrent_requests = config.fetch.concurrent_requests,
        inter_request_secs = config.fetch.inter_request_secs,
        "설정 로드 완료"
    );

    match cli.command {
        Commands::Validate => {
            let universe = config.load_universe()?;
            config.load_secret()?;
            tracing::info!(
                symbols = universe.len(),
                coin_list = %config.sources.coin_list_file.display(),
                "설정 검증 완료"
            );
        }
        Commands::RunOnce { memory_store } => {
            let store: SharedStore = if memory_store {
                tracing::warn!("메모리 저장소 사용: 수집 결과는 프로세스 종료 시 사라집니다");
                Arc::new(MemoryStore::new())
            } else {
                connect_store(&config).await?
            };

            let cycle = IngestionCycle::from_config(&config, store)?;
            let report = cycle.run().await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Daemon => {
            let store = connect_store(&config).await?;
            let cycle = IngestionCycle::from_config(&config, store)?;

            let shutdown = CancellationToken::new();
            tokio::spawn(shutdown_signal(shutdown.clone()));

            let mut scheduler = Scheduler::new(cycle, config.schedule.interval());
            scheduler.run(shutdown).await;
        }
    }

    tracing::info!("Coinfeed Collector 종료");

    Ok(())
}

async fn connect_store(config: &CollectorConfig) -> Result<SharedStore, Box<dyn std::error::Error>> {
    let store = RedisStore::connect(&config.redis).await?;
    tracing::info!(url = %config.redis.url, "저장소 연결 성공");
    Ok(Arc::new(store))
}

/// Ctrl+C 또는 SIGTERM 수신 시 종료 토큰을 취소합니다.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::warn!("Ctrl+C 수신, 진행 중인 사이클이 끝나면 종료합니다"),
        _ = terminate => tracing::warn!("SIGTERM 수신, 진행 중인 사이클이 끝나면 종료합니다"),
    }

    shutdown.cancel();
}
