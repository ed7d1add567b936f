//! Order, payment, and user role enums.
//!
//! Every enum here serializes to the SCREAMING_SNAKE_CASE string used on the
//! wire and in storage. `Display`/`FromStr` use the same representation, so
//! a value round-trips identically through JSON and a TEXT column.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown enum value.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown {kind}: {value}")]
pub struct StatusParseError {
    kind: &'static str,
    value: String,
}

macro_rules! status_enum {
    (
        $(#[$meta:meta])*
        $name:ident as $kind:literal {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $wire:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Wire and storage representation.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = StatusParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(StatusParseError {
                        kind: $kind,
                        value: other.to_owned(),
                    }),
                }
            }
        }

        #[cfg(feature = "postgres")]
        impl sqlx::Type<sqlx::Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s = <String as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
                Ok(s.parse()?)
            }
        }

        #[cfg(feature = "postgres")]
        impl sqlx::Encode<'_, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <&str as sqlx::Encode<'_, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }
    };
}

status_enum! {
    /// Fulfillment state of an order.
    ///
    /// Orders start `Pending` and move to `Processing` once payment is
    /// confirmed. Later fulfillment states are set outside this service.
    OrderStatus as "order status" {
        /// Placed but not yet paid or picked for fulfillment.
        Pending => "PENDING",
        /// Payment confirmed, awaiting shipment.
        Processing => "PROCESSING",
        /// Handed to the carrier.
        Shipped => "SHIPPED",
        /// Delivered to the customer.
        Delivered => "DELIVERED",
        /// Cancelled before fulfillment.
        Cancelled => "CANCELLED",
    }
}

status_enum! {
    /// Payment state of an order.
    PaymentStatus as "payment status" {
        /// Awaiting confirmation. Every order starts here, card or not.
        Pending => "PENDING",
        /// Confirmed by the customer's return from the payment flow.
        Completed => "COMPLETED",
    }
}

status_enum! {
    /// How the customer chose to pay.
    PaymentMethod as "payment method" {
        /// Card payment through the payment gateway.
        Card => "CARD",
        /// Settled in cash at delivery time. No gateway involvement.
        CashOnDelivery => "CASH_ON_DELIVERY",
    }
}

status_enum! {
    /// Authorization role carried in the session.
    UserRole as "user role" {
        /// Regular shopper. Sees only their own orders.
        User => "USER",
        /// Staff. May view any order.
        Admin => "ADMIN",
    }
}

impl UserRole {
    /// Whether this role grants access to other users' orders.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}
