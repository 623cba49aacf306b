// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — scoped decoding of source files into RGB page buffers.

pub mod loader;

pub use loader::DecodedImage;
