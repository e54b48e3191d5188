// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (authentication, security, subdomain routing).

pub mod auth;
pub mod security;
pub mod subdomain;

pub use auth::require_auth;
pub use subdomain::rewrite_subdomain;
