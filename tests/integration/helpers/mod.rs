// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use migration::{Migrator, MigratorTrait};
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, DbErr};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use veo_relay::application::usecases::video_task::VideoTaskUseCase;
use veo_relay::config::settings::{DatabaseSettings, LegacyOverrides, Settings};
use veo_relay::domain::models::video_task::{NewVideoTask, StatusPatch, VideoTask};
use veo_relay::domain::repositories::task_repository::{RepositoryError, TaskRepository};
use veo_relay::domain::services::video_api::{
    RemoteApiError, VideoGenerationApi, VideoGenerationRequest,
};
use veo_relay::infrastructure::database::connection;
use veo_relay::infrastructure::repositories::task_repo_impl::TaskRepositoryImpl;
use veo_relay::infrastructure::video_api::vector_engine::VectorEngineClient;
use veo_relay::presentation::routes;

/// 测试数据库，临时目录随结构体一起释放
pub struct TestDb {
    pub db: Arc<DatabaseConnection>,
    _dir: TempDir,
}

pub async fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let settings = DatabaseSettings {
        url: None,
        data_dir: dir.path().join("data").display().to_string(),
        file_name: "veo_tasks_test.db".to_string(),
        max_connections: Some(5),
        min_connections: Some(1),
        connect_timeout: Some(10),
        idle_timeout: Some(60),
    };

    let db = connection::create_pool(&settings)
        .await
        .expect("Failed to connect to SQLite");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    TestDb {
        db: Arc::new(db),
        _dir: dir,
    }
}

/// 可编排响应的远程接口替身
pub struct FakeVideoApi {
    configured: bool,
    submit_responses: Mutex<VecDeque<Result<Value, RemoteApiError>>>,
    status_responses: Mutex<VecDeque<Result<Value, RemoteApiError>>>,
    pub submitted: Mutex<Vec<VideoGenerationRequest>>,
    pub submit_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
}

impl FakeVideoApi {
    pub fn new() -> Self {
        Self {
            configured: true,
            submit_responses: Mutex::new(VecDeque::new()),
            status_responses: Mutex::new(VecDeque::new()),
            submitted: Mutex::new(Vec::new()),
            submit_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    pub fn on_submit(self, response: Result<Value, RemoteApiError>) -> Self {
        self.submit_responses.lock().unwrap().push_back(response);
        self
    }

    pub fn on_status(self, response: Result<Value, RemoteApiError>) -> Self {
        self.status_responses.lock().unwrap().push_back(response);
        self
    }

    pub fn submit_count(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn status_count(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoGenerationApi for FakeVideoApi {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn submit(&self, request: VideoGenerationRequest) -> Result<Value, RemoteApiError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.submitted.lock().unwrap().push(request);
        self.submit_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(json!({})))
    }

    async fn fetch_status(&self, _remote_task_id: &str) -> Result<Value, RemoteApiError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.status_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(json!({})))
    }
}

pub type TestUseCase = VideoTaskUseCase<TaskRepositoryImpl, FakeVideoApi>;

/// 组装用例，同时返回仓库与替身以便断言
pub fn build_use_case(
    test_db: &TestDb,
    api: FakeVideoApi,
) -> (Arc<TestUseCase>, Arc<TaskRepositoryImpl>, Arc<FakeVideoApi>) {
    let repo = Arc::new(TaskRepositoryImpl::new(test_db.db.clone()));
    let api = Arc::new(api);
    let use_case = Arc::new(VideoTaskUseCase::new(repo.clone(), api.clone()));
    (use_case, repo, api)
}

pub fn test_settings(base_url: &str, token: Option<&str>) -> Settings {
    let mut settings =
        Settings::with_overrides(LegacyOverrides::default()).expect("Failed to load settings");
    settings.remote.base_url = base_url.to_string();
    settings.remote.api_token = token.map(str::to_string);
    settings.remote.timeout_secs = 5;
    settings
}

/// 端到端测试应用，远程接口指向 `remote_base_url`
pub struct TestApp {
    pub server: axum_test::TestServer,
    pub repo: Arc<TaskRepositoryImpl>,
    _db: TestDb,
}

pub async fn create_test_app(remote_base_url: &str, token: Option<&str>) -> TestApp {
    let test_db = setup_db().await;
    let settings = Arc::new(test_settings(remote_base_url, token));

    let repo = Arc::new(TaskRepositoryImpl::new(test_db.db.clone()));
    let client = VectorEngineClient::new(&settings.remote).expect("Failed to build client");
    let use_case = Arc::new(VideoTaskUseCase::new(repo.clone(), Arc::new(client)));

    let app = routes::routes(use_case, settings);
    let server = axum_test::TestServer::new(app).expect("Failed to start test server");

    TestApp {
        server,
        repo,
        _db: test_db,
    }
}

/// 所有操作都失败的任务仓库，用于覆盖存储错误路径
pub struct BrokenTaskRepository;

impl BrokenTaskRepository {
    fn failure() -> RepositoryError {
        RepositoryError::Database(DbErr::Custom("disk I/O error".to_string()))
    }
}

#[async_trait]
impl TaskRepository for BrokenTaskRepository {
    async fn create(&self, _task: &NewVideoTask) -> Result<i64, RepositoryError> {
        Err(Self::failure())
    }

    async fn bind_remote_id(
        &self,
        _id: i64,
        _remote_task_id: &str,
        _updated_at: DateTime<Utc>,
    ) -> Result<u64, RepositoryError> {
        Err(Self::failure())
    }

    async fn update_by_remote_id(
        &self,
        _remote_task_id: &str,
        _patch: &StatusPatch,
    ) -> Result<u64, RepositoryError> {
        Err(Self::failure())
    }

    async fn list_by_client(&self, _client_id: &str) -> Result<Vec<VideoTask>, RepositoryError> {
        Err(Self::failure())
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<VideoTask>, RepositoryError> {
        Err(Self::failure())
    }
}

/// 基于失败仓库组装的测试服务
pub fn create_broken_store_server(api: FakeVideoApi) -> axum_test::TestServer {
    let use_case = Arc::new(VideoTaskUseCase::new(
        Arc::new(BrokenTaskRepository),
        Arc::new(api),
    ));
    let settings = Arc::new(test_settings("http://localhost/v1", Some("test-token")));
    axum_test::TestServer::new(routes::routes(use_case, settings))
        .expect("Failed to start test server")
}
