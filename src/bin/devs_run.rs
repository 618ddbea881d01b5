//! 发生器 → 处理器 流水线仿真
//!
//! 运行 demo 流水线并打印汇总，可选输出结构化轨迹 JSON。

use clap::Parser;
use devsim_rs::demo::{PipelineOpts, run_pipeline};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Debug, Parser)]
#[command(name = "devs_run", about = "DEVS 流水线仿真：generator -> processor")]
struct Args {
    /// 发生器周期（秒）
    #[arg(long, default_value_t = 1.0)]
    period: f64,
    /// 处理器服务时间（秒）
    #[arg(long, default_value_t = 0.5)]
    service_time: f64,
    /// 最多生成的 Job 数（默认不限）
    #[arg(long)]
    max_jobs: Option<u64>,
    /// 仿真运行到多少秒
    #[arg(long, default_value_t = 10.0)]
    until: f64,
    /// 实时节拍：每仿真秒对应的墙钟秒数
    #[arg(long)]
    time_scale: Option<f64>,
    /// JSON 配置文件（给出时忽略上面的参数）
    #[arg(long)]
    config: Option<PathBuf>,
    /// 轨迹输出路径
    #[arg(long)]
    trace_json: Option<PathBuf>,
}

fn main() -> ExitCode {
    // 初始化 tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();

    let opts = match &args.config {
        Some(path) => {
            let raw = match fs::read_to_string(path) {
                Ok(raw) => raw,
                Err(e) => {
                    error!(path = %path.display(), error = %e, "读取配置失败");
                    return ExitCode::FAILURE;
                }
            };
            match serde_json::from_str::<PipelineOpts>(&raw) {
                Ok(opts) => opts,
                Err(e) => {
                    error!(path = %path.display(), error = %e, "解析配置失败");
                    return ExitCode::FAILURE;
                }
            }
        }
        None => PipelineOpts {
            period: args.period,
            service_time: args.service_time,
            max_jobs: args.max_jobs,
            until: args.until,
            time_scale: args.time_scale,
        },
    };

    let summary = match run_pipeline(&opts, args.trace_json.is_some()) {
        Ok(summary) => summary,
        Err(e) => {
            error!(error = %e, source = ?std::error::Error::source(&e), "仿真中止");
            return ExitCode::FAILURE;
        }
    };

    if let Some(path) = &args.trace_json {
        let json = match serde_json::to_string_pretty(&summary.trace) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "序列化轨迹失败");
                return ExitCode::FAILURE;
            }
        };
        if let Err(e) = fs::write(path, json) {
            error!(path = %path.display(), error = %e, "写入轨迹失败");
            return ExitCode::FAILURE;
        }
    }

    for (t, job) in &summary.completed {
        println!("completed job={} t={}", job.id, t.as_secs());
    }
    println!(
        "done @ {}, generated={}, processed={}, dropped={}",
        summary.final_time, summary.generated, summary.processed, summary.dropped
    );
    ExitCode::SUCCESS
}
