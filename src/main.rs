use anyhow::Context;
use clap::Parser;
use markov_synth::domain::ports::MatrixSink;
use markov_synth::utils::error::ErrorSeverity;
use markov_synth::utils::{logger, validation::Validate};
use markov_synth::{CliConfig, CsvMatrixSink, GeneratorConfig, LocalStorage, MarkovEngine, NoopSink};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting markov-synth");
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = cli.validate() {
        tracing::error!("❌ Invalid arguments: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // 載入並驗證配置
    tracing::info!("📁 Loading configuration from: {}", cli.input);
    let config = match GeneratorConfig::from_file(&cli.input).and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let (split, seed) = cli.resolve(&config);
    let seed = seed.unwrap_or_else(|| {
        let seed = rand::random::<u64>();
        tracing::info!("🎲 No seed given, using {}", seed);
        seed
    });

    let mut sink: Box<dyn MatrixSink> = match &cli.dump_dir {
        Some(dir) => Box::new(
            CsvMatrixSink::new(dir)
                .with_context(|| format!("cannot create dump directory {}", dir))?,
        ),
        None => Box::new(NoopSink),
    };

    let storage = LocalStorage::new(&cli.output);
    let engine = MarkovEngine::new(storage, cli.format).with_bundle(cli.bundle);

    match engine.run(&config, split, seed, &mut sink.as_mut()) {
        Ok(written) => {
            tracing::info!("✅ Generated {} file(s) in {}", written.len(), cli.output);
            for path in &written {
                println!("📁 {}/{}", cli.output, path);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Generation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
