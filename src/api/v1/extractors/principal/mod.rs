/*!
 * Authenticated principal extractor
 *
 * Responsibility:
 * - token middleware が検証済みの Principal を handler に提供する
 *
 * Public API:
 * - CurrentPrincipal
 */

mod core;

pub use core::CurrentPrincipal;
