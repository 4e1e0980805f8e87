/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: Bearer 検証 → AuthContext 注入、authority チェック
 * - cors / http: 全ルート共通の横断的関心事
 */
pub mod auth;
pub mod cors;
pub mod http;
