// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod course_index;
pub mod elasticsearch;
pub mod index;
pub mod loader;
pub mod logging;
pub mod mapper;
pub mod memory_index;
pub mod query;
pub mod search;
pub mod sort;
pub mod suggest;
