//! Playback strategies and the fixed fallback order per format hint.

use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

use super::engine::EngineKind;
use super::surface::RuntimeCapabilities;
use crate::streaming::FormatHint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Adaptive,
    NativeHls,
    Dash,
    Progressive,
    EmbeddedFallback,
}

impl Strategy {
    pub fn engine_kind(&self) -> EngineKind {
        match self {
            Strategy::Adaptive => EngineKind::Adaptive,
            Strategy::NativeHls => EngineKind::Native,
            Strategy::Dash => EngineKind::Dash,
            Strategy::Progressive => EngineKind::Progressive,
            Strategy::EmbeddedFallback => EngineKind::EmbeddedFallback,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Adaptive => "adaptive",
            Strategy::NativeHls => "native-hls",
            Strategy::Dash => "dash",
            Strategy::Progressive => "progressive",
            Strategy::EmbeddedFallback => "embedded-fallback",
        };
        f.write_str(name)
    }
}

/// Remaining strategies for a session, consumed front to back.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FallbackChain {
    steps: VecDeque<Strategy>,
}

impl FallbackChain {
    pub fn next(&mut self) -> Option<Strategy> {
        self.steps.pop_front()
    }

    pub fn remaining(&self) -> impl Iterator<Item = &Strategy> {
        self.steps.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    pub fn to_vec(&self) -> Vec<Strategy> {
        self.steps.iter().copied().collect()
    }
}

impl FromIterator<Strategy> for FallbackChain {
    fn from_iter<I: IntoIterator<Item = Strategy>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

/// Build the ordered chain for a hint. Every chain ends in the embedded fallback.
pub fn plan(hint: FormatHint, capabilities: RuntimeCapabilities) -> FallbackChain {
    let first = match hint {
        FormatHint::Hls if capabilities.adaptive_engine => Some(Strategy::Adaptive),
        FormatHint::Hls if capabilities.native_hls => Some(Strategy::NativeHls),
        FormatHint::Hls => None,
        FormatHint::Dash => Some(Strategy::Dash),
        FormatHint::Progressive | FormatHint::Unknown => Some(Strategy::Progressive),
    };

    first
        .into_iter()
        .chain(std::iter::once(Strategy::EmbeddedFallback))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const FULL: RuntimeCapabilities = RuntimeCapabilities {
        adaptive_engine: true,
        native_hls: true,
    };
    const NATIVE_ONLY: RuntimeCapabilities = RuntimeCapabilities {
        adaptive_engine: false,
        native_hls: true,
    };
    const BARE: RuntimeCapabilities = RuntimeCapabilities {
        adaptive_engine: false,
        native_hls: false,
    };

    #[rstest]
    #[case(FormatHint::Hls, FULL, vec![Strategy::Adaptive, Strategy::EmbeddedFallback])]
    #[case(FormatHint::Hls, NATIVE_ONLY, vec![Strategy::NativeHls, Strategy::EmbeddedFallback])]
    #[case(FormatHint::Hls, BARE, vec![Strategy::EmbeddedFallback])]
    #[case(FormatHint::Dash, BARE, vec![Strategy::Dash, Strategy::EmbeddedFallback])]
    #[case(FormatHint::Progressive, FULL, vec![Strategy::Progressive, Strategy::EmbeddedFallback])]
    #[case(FormatHint::Unknown, FULL, vec![Strategy::Progressive, Strategy::EmbeddedFallback])]
    fn chain_per_hint(
        #[case] hint: FormatHint,
        #[case] caps: RuntimeCapabilities,
        #[case] expected: Vec<Strategy>,
    ) {
        assert_eq!(plan(hint, caps).to_vec(), expected);
    }

    #[test]
    fn chain_is_consumed_in_order() {
        let mut chain = plan(FormatHint::Dash, FULL);
        assert_eq!(chain.next(), Some(Strategy::Dash));
        assert_eq!(chain.next(), Some(Strategy::EmbeddedFallback));
        assert_eq!(chain.next(), None);
        assert!(chain.is_empty());
    }

    #[test]
    fn strategies_map_to_engine_kinds() {
        assert_eq!(Strategy::EmbeddedFallback.engine_kind(), EngineKind::EmbeddedFallback);
        assert_eq!(Strategy::NativeHls.engine_kind(), EngineKind::Native);
    }
}
