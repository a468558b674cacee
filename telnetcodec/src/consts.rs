//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Telnet byte constants used by the game stream.

/// Interpret As Command
pub const IAC: u8 = 255;
/// Refuse to perform, or continue performing, the indicated option
pub const DONT: u8 = 254;
/// Request the other party perform the indicated option
pub const DO: u8 = 253;
/// Refuse to perform, or continue performing, the indicated option
pub const WONT: u8 = 252;
/// Desire to begin performing the indicated option
pub const WILL: u8 = 251;
/// Subnegotiation Begin
pub const SB: u8 = 250;
/// Go Ahead
pub const GA: u8 = 249;
/// Erase Line
pub const EL: u8 = 248;
/// Erase Character
pub const EC: u8 = 247;
/// Are You There
pub const AYT: u8 = 246;
/// Abort Output
pub const AO: u8 = 245;
/// Interrupt Process
pub const IP: u8 = 244;
/// Break
pub const BRK: u8 = 243;
/// Data Mark
pub const DM: u8 = 242;
/// No Operation
pub const NOP: u8 = 241;
/// Subnegotiation End
pub const SE: u8 = 240;
/// End of Record
pub const EOR: u8 = 239;

/// Carriage Return
pub const CR: u8 = b'\r';
/// Line Feed
pub const LF: u8 = b'\n';

/// Telnet option codes understood by the decoder.
pub mod option {
    /// MUD Client Compression Protocol v2
    pub const COMPRESS2: u8 = 86;
    /// Legacy MUD protocol interface carrying the XML mode toggle
    pub const MPI: u8 = 102;
    /// Generic MUD Communication Protocol
    pub const GMCP: u8 = 201;
}
