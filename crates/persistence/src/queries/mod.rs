// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! Every function exists in two monomorphic versions generated by
//! `backend_fn!`: `_sqlite` and `_mysql`. The `Persistence` adapter in
//! `lib.rs` picks one based on the active connection.

pub mod identities;
pub mod shift_requests;
pub mod shifts;
pub mod shops;
pub mod workers;
