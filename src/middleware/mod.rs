/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth::token (token 認証), cors, http (request-id / trace / limit / timeout)
 */
pub mod auth;
pub mod cors;
pub mod http;
