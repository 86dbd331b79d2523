// ==========================================
// S&OP 预测录入系统 - 身份协作者
// ==========================================
// 部署时选定一种后端:
// - LocalList: 进程内用户列表（散列记录）
// - RemoteStore: usuario 表
// ==========================================

use std::sync::Arc;

use crate::domain::types::IdentityBackend;
use crate::domain::user::{AuthenticatedUser, UserRecord};
use crate::identity::error::{IdentityError, IdentityResult};
use crate::identity::password::{hash_password, verify_password};
use crate::repository::{RepositoryError, UserRepository};

pub enum IdentityProvider {
    LocalList(Vec<UserRecord>),
    RemoteStore(Arc<UserRepository>),
}

impl IdentityProvider {
    pub fn backend(&self) -> IdentityBackend {
        match self {
            IdentityProvider::LocalList(_) => IdentityBackend::LocalList,
            IdentityProvider::RemoteStore(_) => IdentityBackend::RemoteStore,
        }
    }

    fn find_user(&self, username: &str) -> IdentityResult<Option<UserRecord>> {
        match self {
            IdentityProvider::LocalList(users) => Ok(users
                .iter()
                .find(|u| u.username.eq_ignore_ascii_case(username))
                .cloned()),
            IdentityProvider::RemoteStore(repo) => Ok(repo.find_by_username(username)?),
        }
    }

    /// 认证；用户不存在、已停用、密码错误均返回 InvalidCredentials
    ///
    /// 两种后端的用户名匹配均为 ASCII 大小写不敏感
    pub fn authenticate(&self, username: &str, password: &str) -> IdentityResult<AuthenticatedUser> {
        let username = username.trim();
        let user = self
            .find_user(username)?
            .filter(|u| u.ativo)
            .ok_or(IdentityError::InvalidCredentials)?;

        if !verify_password(password, &user.password) {
            tracing::info!(username, "登录失败");
            return Err(IdentityError::InvalidCredentials);
        }

        tracing::info!(username, backend = %self.backend(), "登录成功");
        Ok(AuthenticatedUser::from(&user))
    }

    /// 注册新用户（仅 RemoteStore）
    pub fn register(
        &self,
        username: &str,
        nome: &str,
        password: &str,
        iterations: u32,
    ) -> IdentityResult<AuthenticatedUser> {
        let repo = match self {
            IdentityProvider::RemoteStore(repo) => repo,
            IdentityProvider::LocalList(_) => {
                return Err(IdentityError::UnsupportedOperation("register".to_string()))
            }
        };

        let record = UserRecord {
            username: username.trim().to_string(),
            nome: nome.trim().to_string(),
            password: hash_password(password, iterations),
            ativo: true,
        };
        match repo.insert(&record) {
            Ok(()) => Ok(AuthenticatedUser::from(&record)),
            Err(RepositoryError::UniqueConstraintViolation(_)) => {
                Err(IdentityError::UserAlreadyExists(record.username))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 修改密码（校验旧密码后重新加盐，仅 RemoteStore）
    pub fn change_password(
        &self,
        username: &str,
        current: &str,
        next: &str,
        iterations: u32,
    ) -> IdentityResult<()> {
        let repo = match self {
            IdentityProvider::RemoteStore(repo) => repo,
            IdentityProvider::LocalList(_) => {
                return Err(IdentityError::UnsupportedOperation("change_password".to_string()))
            }
        };
        self.authenticate(username, current)?;
        repo.update_password(username.trim(), &hash_password(next, iterations))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory_with_schema;
    use std::sync::Mutex;

    const ITER: u32 = 1_000;

    fn local_user(username: &str, password: &str, ativo: bool) -> UserRecord {
        UserRecord {
            username: username.to_string(),
            nome: username.to_uppercase(),
            password: hash_password(password, ITER),
            ativo,
        }
    }

    fn remote() -> IdentityProvider {
        let conn = Arc::new(Mutex::new(open_in_memory_with_schema().unwrap()));
        IdentityProvider::RemoteStore(Arc::new(UserRepository::new(conn)))
    }

    #[test]
    fn test_local_list_authenticate() {
        let provider = IdentityProvider::LocalList(vec![
            local_user("ana", "segredo", true),
            local_user("bia", "segredo", false),
        ]);

        let user = provider.authenticate(" ana ", "segredo").unwrap();
        assert_eq!(user.username, "ana");
        assert_eq!(provider.authenticate("ANA", "segredo").unwrap().username, "ana");
        assert!(matches!(
            provider.authenticate("ana", "errado"),
            Err(IdentityError::InvalidCredentials)
        ));
        assert!(matches!(
            provider.authenticate("bia", "segredo"),
            Err(IdentityError::InvalidCredentials)
        ));
        assert!(matches!(
            provider.register("caio", "Caio", "x", ITER),
            Err(IdentityError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_remote_store_register_login_change_password() {
        let provider = remote();
        provider.register("ana", "Ana", "segredo", ITER).unwrap();
        assert!(matches!(
            provider.register("ana", "Ana", "outro", ITER),
            Err(IdentityError::UserAlreadyExists(_))
        ));

        assert_eq!(provider.authenticate("ana", "segredo").unwrap().nome, "Ana");

        assert_eq!(provider.authenticate("ANA", "segredo").unwrap().username, "ana");
        assert!(matches!(
            provider.register("Ana", "Ana", "outro", ITER),
            Err(IdentityError::UserAlreadyExists(_))
        ));

        provider.change_password("ana", "segredo", "novo", ITER).unwrap();
        assert!(provider.authenticate("ana", "segredo").is_err());
        assert!(provider.authenticate("ana", "novo").is_ok());
    }
}
