use anyhow::Result;
use content_wizard::utils::logging;
use content_wizard::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置：可选的 TOML 文件 + 环境变量
    let config = match std::env::var("CONFIG_PATH") {
        Ok(path) => Config::from_toml_file(path)?.with_env_overrides()?,
        Err(_) => Config::from_env()?,
    };

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}
