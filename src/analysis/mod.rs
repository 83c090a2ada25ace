// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Scene analysis derived from detection results

pub mod scene;

pub use scene::{
    LabelSet, SceneAnalysis, SceneClassifier, SceneRule, SceneType, SceneVocabulary,
    EMPTY_SCENE_SUMMARY,
};
