//! Turning fetched bodies into records.
//!
//! Every extractor is a pure function over an already-fetched body, so the
//! rules can be tested on fixture markup without a network.
//!
//! | Module | Input | Output | Used by |
//! |--------|-------|--------|---------|
//! | [`feed`] | RSS/Atom bytes | [`Article`](crate::models::Article), [`Paper`](crate::models::Paper) | news, papers |
//! | [`heuristic`] | arbitrary HTML page | [`Article`](crate::models::Article) listings | grants, funding |
//! | [`trending`] | trending page HTML | [`Repo`](crate::models::Repo) | github |
//! | [`dedup`] | one extraction batch | the batch without repeats | all agents |

pub mod dedup;
pub mod feed;
pub mod heuristic;
pub mod trending;
