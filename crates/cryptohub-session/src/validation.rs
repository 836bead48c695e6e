//! Client-side form validation. Nothing here touches the network.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::models::{
    CreateInvestmentRequest, LoginRequest, RegisterRequest, TransferRequest, WithdrawRequest,
};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_USERNAME_LEN: usize = 3;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email regex is valid"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter your email and password.")]
    MissingCredentials,
    #[error("Please fill in all fields.")]
    MissingFields,
    #[error("Passwords do not match.")]
    PasswordMismatch,
    #[error("Password must be at least {} characters long.", MIN_PASSWORD_LEN)]
    PasswordTooShort,
    #[error("Username must be at least {} characters long.", MIN_USERNAME_LEN)]
    UsernameTooShort,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("You must accept the terms and conditions.")]
    TermsNotAccepted,
    #[error("Please enter a valid amount greater than zero.")]
    InvalidAmount,
    #[error("Please enter the {0}.")]
    MissingField(&'static str),
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Parse a user-entered amount: finite and strictly positive.
pub fn parse_amount(raw: &str) -> Result<f64, ValidationError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(ValidationError::InvalidAmount),
    }
}

fn required(value: &str, label: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(label))
    } else {
        Ok(trimmed.to_string())
    }
}

// ── Login ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<LoginRequest, ValidationError> {
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingCredentials);
        }
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(LoginRequest {
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

// ── Registration ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub accept_terms: bool,
}

impl RegisterForm {
    /// Checks run in a fixed order and stop at the first failure:
    /// required fields, password match, password length, username length,
    /// email format, terms.
    pub fn validate(&self) -> Result<RegisterRequest, ValidationError> {
        let firstname = self.firstname.trim();
        let lastname = self.lastname.trim();
        let username = self.username.trim();
        let email = self.email.trim();

        if [firstname, lastname, username, email].iter().any(|f| f.is_empty())
            || self.password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Err(ValidationError::MissingFields);
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort);
        }
        if username.chars().count() < MIN_USERNAME_LEN {
            return Err(ValidationError::UsernameTooShort);
        }
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail);
        }
        if !self.accept_terms {
            return Err(ValidationError::TermsNotAccepted);
        }

        Ok(RegisterRequest {
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

// ── Wallet forms ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct TransferForm {
    pub recipient: String,
    pub asset: String,
    pub amount: String,
}

impl TransferForm {
    pub fn validate(&self) -> Result<TransferRequest, ValidationError> {
        Ok(TransferRequest {
            recipient: required(&self.recipient, "recipient")?,
            asset: required(&self.asset, "asset")?,
            amount: parse_amount(&self.amount)?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct WithdrawForm {
    pub address: String,
    pub asset: String,
    pub amount: String,
}

impl WithdrawForm {
    pub fn validate(&self) -> Result<WithdrawRequest, ValidationError> {
        Ok(WithdrawRequest {
            address: required(&self.address, "destination address")?,
            asset: required(&self.asset, "asset")?,
            amount: parse_amount(&self.amount)?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct InvestmentForm {
    pub plan: String,
    pub asset: String,
    pub amount: String,
}

impl InvestmentForm {
    pub fn validate(&self) -> Result<CreateInvestmentRequest, ValidationError> {
        Ok(CreateInvestmentRequest {
            plan: required(&self.plan, "investment plan")?,
            asset: required(&self.asset, "asset")?,
            amount: parse_amount(&self.amount)?,
        })
    }
}
