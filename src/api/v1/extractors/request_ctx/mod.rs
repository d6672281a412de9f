/*!
 * Request context extractor
 *
 * Responsibility:
 * - access middleware が組み立てた RequestContext を handler に提供する
 * - 型定義は services::auth::context 側、ここは axum との接続だけ
 */

mod core;

pub use core::Ctx;
