//! Login/registration form, gated on backend availability.

use crate::api::ClassificationApi;
use crate::context::SessionContext;
use crate::health::Availability;
use crate::{CoreError, Credentials};

pub const PASSWORD_MISMATCH: &str = "Passwords do not match";
pub const REGISTERED_MESSAGE: &str = "Registration successful! You can now log in.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthField {
    #[default]
    Email,
    Password,
    Confirm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRequest {
    Login(Credentials),
    Register(Credentials),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    SignedIn { role: Option<String> },
    Registered,
}

/// Editable state of the authentication screen.
#[derive(Debug, Clone, Default)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub field: AuthField,
    pub email: String,
    pub password: String,
    pub confirm: String,
    pub error: Option<String>,
    pub success: Option<String>,
    pub submitting: bool,
}

impl AuthForm {
    pub fn fields(&self) -> &'static [AuthField] {
        match self.mode {
            AuthMode::Login => &[AuthField::Email, AuthField::Password],
            AuthMode::Register => &[AuthField::Email, AuthField::Password, AuthField::Confirm],
        }
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
        self.field = AuthField::Email;
        self.confirm.clear();
        self.error = None;
        self.success = None;
    }

    pub fn next_field(&mut self) {
        let fields = self.fields();
        let pos = fields.iter().position(|f| *f == self.field).unwrap_or(0);
        self.field = fields[(pos + 1) % fields.len()];
    }

    pub fn prev_field(&mut self) {
        let fields = self.fields();
        let pos = fields.iter().position(|f| *f == self.field).unwrap_or(0);
        self.field = fields[(pos + fields.len() - 1) % fields.len()];
    }

    pub fn input(&mut self, c: char) {
        self.focused_mut().push(c);
    }

    pub fn backspace(&mut self) {
        self.focused_mut().pop();
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.field {
            AuthField::Email => &mut self.email,
            AuthField::Password => &mut self.password,
            AuthField::Confirm => &mut self.confirm,
        }
    }

    /// Validate locally and build the request. Nothing reaches the network
    /// unless the backend is known to be available.
    pub fn prepare(&mut self, availability: Availability) -> Result<AuthRequest, CoreError> {
        if self.submitting {
            return Err(CoreError::Validation("a request is already in progress".into()));
        }
        self.error = None;
        self.success = None;

        let result = self.validate(availability);
        match &result {
            Ok(_) => self.submitting = true,
            Err(e) => self.error = Some(message_for(self.mode, e)),
        }
        result
    }

    fn validate(&self, availability: Availability) -> Result<AuthRequest, CoreError> {
        if !availability.allows_auth() {
            return Err(CoreError::BackendUnavailable);
        }
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            return Err(CoreError::Validation(
                "Email and password are required".into(),
            ));
        }
        let credentials = Credentials {
            email: email.to_string(),
            password: self.password.clone(),
        };
        match self.mode {
            AuthMode::Login => Ok(AuthRequest::Login(credentials)),
            AuthMode::Register if self.password != self.confirm => {
                Err(CoreError::Validation(PASSWORD_MISMATCH.into()))
            }
            AuthMode::Register => Ok(AuthRequest::Register(credentials)),
        }
    }

    pub fn finish(&mut self, result: &Result<AuthOutcome, CoreError>) {
        self.submitting = false;
        match result {
            Ok(AuthOutcome::Registered) => {
                self.mode = AuthMode::Login;
                self.field = AuthField::Email;
                self.password.clear();
                self.confirm.clear();
                self.success = Some(REGISTERED_MESSAGE.to_string());
            }
            Ok(AuthOutcome::SignedIn { .. }) => {
                self.password.clear();
                self.confirm.clear();
            }
            Err(e) => self.error = Some(message_for(self.mode, e)),
        }
    }
}

fn message_for(mode: AuthMode, error: &CoreError) -> String {
    match (error, mode) {
        (CoreError::Validation(_) | CoreError::BackendUnavailable | CoreError::Io(_), _) => {
            error.user_message()
        }
        (_, AuthMode::Login) => "Invalid email or password".to_string(),
        (_, AuthMode::Register) => "Registration failed. Please try again.".to_string(),
    }
}

/// Send a prepared request. A successful login is stored in `context`.
pub async fn submit(
    api: &dyn ClassificationApi,
    context: &SessionContext,
    request: AuthRequest,
) -> Result<AuthOutcome, CoreError> {
    match request {
        AuthRequest::Login(credentials) => {
            tracing::info!(email = %credentials.email, "logging in");
            let response = api.login(credentials).await?;
            let token = response
                .token
                .filter(|t| !t.is_empty())
                .ok_or_else(|| CoreError::Decode("token not found in login response".into()))?;
            context.sign_in(token, response.authorities)?;
            Ok(AuthOutcome::SignedIn {
                role: context.role(),
            })
        }
        AuthRequest::Register(credentials) => {
            tracing::info!(email = %credentials.email, "registering");
            api.register(credentials).await?;
            Ok(AuthOutcome::Registered)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{Call, MockApi};
    use crate::{Authority, LoginResponse};

    fn filled(mode: AuthMode) -> AuthForm {
        AuthForm {
            mode,
            email: "rev@example.com".into(),
            password: "secret".into(),
            confirm: "secret".into(),
            ..AuthForm::default()
        }
    }

    #[test]
    fn submission_blocked_unless_available() {
        for availability in [Availability::Unknown, Availability::Unavailable] {
            let mut form = filled(AuthMode::Login);
            assert_eq!(
                form.prepare(availability),
                Err(CoreError::BackendUnavailable)
            );
            assert!(!form.submitting);
            assert!(form.error.is_some());
        }
    }

    #[test]
    fn password_mismatch_is_local_validation() {
        let mut form = filled(AuthMode::Register);
        form.confirm = "other".into();
        let err = form.prepare(Availability::Available).unwrap_err();
        assert_eq!(err, CoreError::Validation(PASSWORD_MISMATCH.into()));
        assert_eq!(form.error.as_deref(), Some(PASSWORD_MISMATCH));
    }

    #[test]
    fn double_submit_is_rejected() {
        let mut form = filled(AuthMode::Login);
        assert!(form.prepare(Availability::Available).is_ok());
        assert!(form.prepare(Availability::Available).is_err());
    }

    #[test]
    fn registration_switches_to_login() {
        let mut form = filled(AuthMode::Register);
        form.prepare(Availability::Available).unwrap();
        form.finish(&Ok(AuthOutcome::Registered));
        assert_eq!(form.mode, AuthMode::Login);
        assert_eq!(form.success.as_deref(), Some(REGISTERED_MESSAGE));
        assert!(form.password.is_empty());
    }

    #[test]
    fn field_cycle_follows_mode() {
        let mut form = AuthForm::default();
        form.next_field();
        form.next_field();
        assert_eq!(form.field, AuthField::Email);

        form.toggle_mode();
        form.prev_field();
        assert_eq!(form.field, AuthField::Confirm);
        form.input('x');
        form.input('y');
        form.backspace();
        assert_eq!(form.confirm, "x");
    }

    #[tokio::test]
    async fn login_stores_token_and_role() {
        let api = MockApi::new();
        api.queue_login(Ok(LoginResponse {
            token: Some("jwt".into()),
            authorities: vec![Authority {
                authority: "ROLE_USER".into(),
            }],
        }));
        let ctx = SessionContext::in_memory();
        let request = AuthRequest::Login(Credentials {
            email: "rev@example.com".into(),
            password: "secret".into(),
        });

        let outcome = submit(&api, &ctx, request).await.unwrap();
        assert_eq!(
            outcome,
            AuthOutcome::SignedIn {
                role: Some("USER".into())
            }
        );
        assert_eq!(ctx.token().as_deref(), Some("jwt"));
        assert_eq!(
            api.calls(),
            vec![Call::Login {
                email: "rev@example.com".into()
            }]
        );
    }

    #[tokio::test]
    async fn login_without_token_fails() {
        let api = MockApi::new();
        api.queue_login(Ok(LoginResponse {
            token: None,
            authorities: vec![],
        }));
        let ctx = SessionContext::in_memory();
        let request = AuthRequest::Login(Credentials {
            email: "a@b.c".into(),
            password: "p".into(),
        });
        assert!(matches!(
            submit(&api, &ctx, request).await,
            Err(CoreError::Decode(_))
        ));
        assert!(!ctx.is_authenticated());
    }
}
