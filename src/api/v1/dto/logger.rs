/*
 * Responsibility
 * - Logger (log filter) の request/response DTO
 */
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoggerRequest {
    pub filter: String,
}

#[derive(Debug, Serialize)]
pub struct LoggerResponse {
    pub filter: String,
}
