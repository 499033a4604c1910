use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};

// Database keys are positive 64-bit integers. Each entity gets its own
// newtype so an event id cannot be handed to a query expecting a room id.
macro_rules! define_id {
    ($id_type:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            Serialize,
            Deserialize,
            sqlx::Type,
        )]
        #[serde(try_from = "i64", into = "i64")]
        #[sqlx(transparent)]
        pub struct $id_type(i64);

        impl $id_type {
            pub fn new(value: i64) -> AppResult<Self> {
                if value <= 0 {
                    return Err(AppError::UnprocessableEntity(format!(
                        "{} must be positive, got {value}",
                        stringify!($id_type)
                    )));
                }
                Ok(Self(value))
            }
        }

        impl TryFrom<i64> for $id_type {
            type Error = AppError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$id_type> for i64 {
            fn from(value: $id_type) -> Self {
                value.0
            }
        }

        impl std::fmt::Display for $id_type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_id!(CompanyId);
define_id!(UserId);
define_id!(RoomId);
define_id!(EventId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_values_make_valid_ids() {
        assert!(RoomId::new(1).is_ok());
        assert!(UserId::new(i64::MAX).is_ok());
    }

    #[test]
    fn zero_and_negative_values_are_rejected() {
        assert!(RoomId::new(0).is_err());
        assert!(UserId::new(-7).is_err());
    }
}
