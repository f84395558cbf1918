// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Effects, their materials and the shared parameter pool.

mod effect;
mod effect_manager;
mod frame_uniforms;
mod material;
mod parameter_differ;
mod technique;

pub use self::effect::*;
pub use self::effect_manager::*;
pub use self::frame_uniforms::*;
pub use self::material::*;
pub use self::parameter_differ::*;
pub use self::technique::*;
