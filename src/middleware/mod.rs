/*
 * Responsibility
 * - middlware の公開インターフェース
 * - auth (Bearer 検証 + role 要件), http (request id / trace / limit), security headers
 */
pub mod auth;
pub mod http;
pub mod security_headers;
