// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod backend;
pub mod course;
pub mod schema;
pub mod search;
pub mod version;
