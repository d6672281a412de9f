/*
 * Responsibility
 * - /api/v1 の認証 (access) と認可 (authorize)
 * - access が外側: RequestContext を作ってから authorize が Subject を読む
 */
pub mod access;
pub mod authorize;
