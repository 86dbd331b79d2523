// ==========================================
// AuthApi 集成测试
// ==========================================
// 测试范围:
// 1. 注册: 加盐散列存储、重复用户名
// 2. 登录: 正确/错误密码、未知用户
// 3. 修改密码
// 4. LocalList 后端只读
// ==========================================

mod helpers;

use std::sync::Arc;

use helpers::api_test_helper::ApiTestEnv;
use helpers::mock_config::MockConfig;

use sop_forecast::api::{ApiError, AuthApi, LoginRequest, RegisterRequest};
use sop_forecast::config::ForecastConfigReader;
use sop_forecast::domain::{IdentityBackend, UserRecord};
use sop_forecast::identity::{hash_password, IdentityProvider};
use sop_forecast::repository::UserRepository;

fn register(username: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        nome: "Ana Souza".to_string(),
        password: password.to_string(),
    }
}

fn login(username: &str, password: &str) -> LoginRequest {
    LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn test_register_then_login() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let user = env
        .auth_api
        .register_user(&register("ana", "segredo"))
        .await
        .expect("注册失败");
    assert_eq!(user.username, "ana");

    let logged = env.auth_api.login(&login("ana", "segredo")).expect("登录失败");
    assert_eq!(logged.nome, "Ana Souza");

    assert!(matches!(
        env.auth_api.login(&login("ana", "errado")),
        Err(ApiError::InvalidCredentials)
    ));
    assert!(matches!(
        env.auth_api.login(&login("ninguem", "segredo")),
        Err(ApiError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn test_password_stored_salted() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.auth_api
        .register_user(&register("ana", "segredo"))
        .await
        .expect("注册失败");
    env.auth_api
        .register_user(&register("bia", "segredo"))
        .await
        .expect("注册失败");

    let repo = UserRepository::new(env.conn.clone());
    let ana = repo.find_by_username("ana").expect("查询失败").expect("用户不存在");
    let bia = repo.find_by_username("bia").expect("查询失败").expect("用户不存在");

    assert_ne!(ana.password.hash, "segredo");
    assert_ne!(ana.password.salt, bia.password.salt);
    assert_ne!(ana.password.hash, bia.password.hash);
    assert_eq!(ana.password.iterations, 1_000);
}

#[tokio::test]
async fn test_register_duplicate_and_empty() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.auth_api
        .register_user(&register("ana", "segredo"))
        .await
        .expect("注册失败");

    assert!(matches!(
        env.auth_api.register_user(&register("ana", "outro")).await,
        Err(ApiError::UserAlreadyExists(_))
    ));
    assert!(matches!(
        env.auth_api.register_user(&register("  ", "x")).await,
        Err(ApiError::InvalidInput(_))
    ));
    assert!(matches!(
        env.auth_api.register_user(&register("caio", "")).await,
        Err(ApiError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn test_change_password() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.auth_api
        .register_user(&register("ana", "segredo"))
        .await
        .expect("注册失败");

    assert!(matches!(
        env.auth_api.change_password("ana", "errado", "novo").await,
        Err(ApiError::InvalidCredentials)
    ));

    env.auth_api
        .change_password("ana", "segredo", "novo")
        .await
        .expect("修改失败");
    assert!(env.auth_api.login(&login("ana", "segredo")).is_err());
    assert!(env.auth_api.login(&login("ana", "novo")).is_ok());
}

#[tokio::test]
async fn test_local_list_backend() {
    let config: Arc<dyn ForecastConfigReader> = Arc::new(MockConfig::default());
    let provider = IdentityProvider::LocalList(vec![UserRecord {
        username: "ana".to_string(),
        nome: "Ana".to_string(),
        password: hash_password("segredo", 1_000),
        ativo: true,
    }]);
    let api = AuthApi::new(Arc::new(provider), config);

    assert_eq!(api.backend(), IdentityBackend::LocalList);
    assert!(api.login(&login("ana", "segredo")).is_ok());
    assert!(matches!(
        api.register_user(&register("bia", "x")).await,
        Err(ApiError::UnsupportedOperation(_))
    ));
}
