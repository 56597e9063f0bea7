mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "stackdock")]
#[command(about = "Spring Bootプロジェクトからdocker-composeファイルを生成する", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// composeファイルを生成
    Generate(commands::generate::GenerateArgs),
    /// バージョンを表示
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ログはstderrに出力（RUST_LOGで制御）
    tracing_subscriber::fmt::init();

    match cli.command {
        Commands::Version => {
            println!("stackdock {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Generate(args) => commands::generate::handle(args),
    }
}
