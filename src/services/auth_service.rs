use crate::entities::{session_revocation_entity as session_revocations, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::{
    AuthResponse, LoginRequest, PlanType, RegisterRequest, Role, SIGNUP_CREDITS,
    SessionStatusResponse, UserResponse,
};
use crate::services::audit::record_activity;
use crate::utils::{Claims, JwtService, hash_password, validate_email, validate_password, verify_password};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use serde_json::json;

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
    admin_emails: Vec<String>,
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService, admin_emails: Vec<String>) -> Self {
        Self {
            pool,
            jwt_service,
            admin_emails,
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        let email = request.email.trim().to_lowercase();
        validate_email(&email)?;
        validate_password(&request.password)?;

        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(email.clone()))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let role = if self.is_admin_email(&email) {
            Role::Admin
        } else {
            Role::User
        };

        let user = users::ActiveModel {
            email: Set(email.clone()),
            display_name: Set(request.display_name),
            password_hash: Set(hash_password(&request.password)?),
            role: Set(role),
            credits: Set(SIGNUP_CREDITS),
            plan_type: Set(PlanType::Free),
            last_login: Set(Some(Utc::now())),
            login_count: Set(1),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        record_activity(&self.pool, user.id, "register", json!({ "email": email }), 0).await?;

        self.issue_tokens(user)
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let email = request.email.trim().to_lowercase();

        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email.clone()))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid email or password".to_string()))?;

        // Rows provisioned lazily by the subscription path carry an empty
        // hash and cannot be signed into until a real registration lands.
        if user.password_hash.is_empty()
            || !verify_password(&request.password, &user.password_hash)?
        {
            return Err(AppError::AuthError("Invalid email or password".to_string()));
        }

        if user.is_blocked {
            return Err(AppError::Forbidden);
        }

        // Promote on sign-in when the email was added to the admin list
        // after the account was created.
        let role = if self.is_admin_email(&email) { Role::Admin } else { user.role };

        let user_id = user.id;
        let login_count = user.login_count;
        let mut active = user.into_active_model();
        active.role = Set(role);
        active.last_login = Set(Some(Utc::now()));
        active.login_count = Set(login_count + 1);
        let user = active.update(&self.pool).await?;

        record_activity(&self.pool, user_id, "login", json!({ "email": email }), 0).await?;

        self.issue_tokens(user)
    }

    /// Exchange a refresh token for a new pair. This is where force-logout
    /// and the block flag actually bite: a token issued before the newest
    /// revocation sentinel, or a blocked account, cannot refresh.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        let claims = self.jwt_service.verify_refresh_token(refresh_token)?;
        let user_id = claims.user_id();

        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("Account no longer exists".to_string()))?;

        if user.is_blocked {
            return Err(AppError::Forbidden);
        }

        if self.is_revoked_since(user_id, claims.iat).await? {
            return Err(AppError::AuthError("Session has been revoked".to_string()));
        }

        self.issue_tokens(user)
    }

    /// Session validity as of now. Clients poll this as the fallback beside
    /// the realtime `force_logout` push.
    pub async fn session_status(&self, claims: &Claims) -> AppResult<SessionStatusResponse> {
        let user_id = claims.user_id();

        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let revoked = self.is_revoked_since(user_id, claims.iat).await?;

        Ok(SessionStatusResponse {
            valid: !revoked && !user.is_blocked,
            is_blocked: user.is_blocked,
        })
    }

    pub async fn me(&self, user_id: i64) -> AppResult<UserResponse> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        Ok(user.into())
    }

    // -----------------------------
    // Internal helpers
    // -----------------------------

    fn is_admin_email(&self, email: &str) -> bool {
        self.admin_emails.iter().any(|e| e == email)
    }

    async fn is_revoked_since(&self, user_id: i64, token_iat: i64) -> AppResult<bool> {
        let latest = session_revocations::Entity::find()
            .filter(session_revocations::Column::UserId.eq(user_id))
            .order_by_desc(session_revocations::Column::RevokedAt)
            .one(&self.pool)
            .await?;

        Ok(match latest.and_then(|r| r.revoked_at) {
            Some(revoked_at) => revoked_at.timestamp() > token_iat,
            None => false,
        })
    }

    fn issue_tokens(&self, user: users::Model) -> AppResult<AuthResponse> {
        let access_token =
            self.jwt_service
                .generate_access_token(user.id, &user.email, user.role)?;
        let refresh_token =
            self.jwt_service
                .generate_refresh_token(user.id, &user.email, user.role)?;

        Ok(AuthResponse {
            expires_in: self.jwt_service.get_access_token_expires_in(),
            user: user.into(),
            access_token,
            refresh_token,
        })
    }
}
