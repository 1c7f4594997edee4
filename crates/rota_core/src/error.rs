use std::fmt;

use crate::users::Role;

/// Session error taxonomy: user-correctable validation failures, stale
/// references, and inconsistent calls that are rejected without mutating
/// session state. There is no fatal or retryable category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    // Validation errors
    InvalidPhoneNumber,
    InvalidConfirmationCode,
    MissingDestination,
    InvalidFare,
    InvalidPricingValue,

    // Stale references
    OfferExpired,

    // Inconsistent calls
    NoActiveSession,
    RoleMismatch(Role),
    RideInProgress,
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::Passenger => "passageiros",
        Role::Driver => "motoristas",
        Role::Admin => "administradores",
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::InvalidPhoneNumber => {
                write!(f, "Por favor, insira um número de telefone válido.")
            }
            SessionError::InvalidConfirmationCode => {
                write!(f, "Código de confirmação inválido.")
            }
            SessionError::MissingDestination => write!(f, "Por favor, insira um destino."),
            SessionError::InvalidFare => write!(f, "Valor de proposta inválido."),
            SessionError::InvalidPricingValue => {
                write!(f, "Configuração de preços inválida.")
            }
            SessionError::OfferExpired => write!(f, "Proposta expirada."),
            SessionError::NoActiveSession => write!(f, "Nenhum usuário autenticado."),
            SessionError::RoleMismatch(role) => {
                write!(f, "Ação disponível apenas para {}.", role_name(*role))
            }
            SessionError::RideInProgress => {
                write!(f, "Já existe uma corrida em andamento.")
            }
        }
    }
}

impl std::error::Error for SessionError {}

pub type SessionResult<T> = Result<T, SessionError>;
