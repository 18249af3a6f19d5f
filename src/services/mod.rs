/*
 * Responsibility
 * - Domain services that handlers and middleware depend on
 * - auth: token codec, clock, login policy
 * - access_log: per-request log sinks
 */
pub mod access_log;
pub mod auth;
