//! Typestate tokens for the per-frame pipeline.
//!
//! Every stage consumes the token of the stage before it and hands back its
//! own, so `step` cannot compute forces before densities or integrate before
//! forces. Tokens can only be minted by rebuilding the hash grid.

use std::marker::PhantomData;

#[derive(Debug)]
pub struct Hashed;
#[derive(Debug)]
pub struct DensitiesValid;
#[derive(Debug)]
pub struct ForcesValid;
#[derive(Debug)]
pub struct Integrated;

/// Proof that every particle has finished stage `S` of frame `frame`.
#[must_use = "the next pipeline stage needs this token"]
#[derive(Debug)]
pub struct StageToken<S> {
    frame: u64,
    _stage: PhantomData<S>,
}

impl StageToken<Hashed> {
    pub(crate) fn begin(frame: u64) -> Self {
        Self {
            frame,
            _stage: PhantomData,
        }
    }
}

impl<S> StageToken<S> {
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub(crate) fn advance<T>(self) -> StageToken<T> {
        StageToken {
            frame: self.frame,
            _stage: PhantomData,
        }
    }
}
