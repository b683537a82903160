// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use veo_relay::application::usecases::video_task::VideoTaskUseCase;
use veo_relay::config::settings::Settings;
use veo_relay::infrastructure::database::connection;
use veo_relay::infrastructure::repositories::task_repo_impl::TaskRepositoryImpl;
use veo_relay::infrastructure::video_api::vector_engine::VectorEngineClient;
use veo_relay::presentation::routes;
use veo_relay::utils::telemetry;

use migration::{Migrator, MigratorTrait};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load .env and initialize logging
    dotenvy::dotenv().ok();
    telemetry::init_telemetry();
    info!("Starting veo-relay...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");
    if settings
        .remote
        .api_token
        .as_deref()
        .map_or(true, |t| t.trim().is_empty())
    {
        warn!("VECTOR_API_TOKEN is not set; video requests will be rejected");
    }

    veo_relay::infrastructure::metrics::init_metrics(&settings.metrics);

    // 3. Connect to database
    let db = connection::create_pool(&settings.database).await?;
    let db = Arc::new(db);
    info!("Database connection established");

    // Run database migrations
    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Initialize components
    let task_repo = Arc::new(TaskRepositoryImpl::new(db.clone()));
    let video_api = Arc::new(VectorEngineClient::new(&settings.remote)?);
    let use_case = Arc::new(VideoTaskUseCase::new(task_repo, video_api));

    // 5. Start HTTP server
    let app = routes::routes(use_case, settings.clone());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
