//! Static mapping from animation state to rectangles in the sprite sheet.
//!
//! The sheet is a fixed grid of 32x32 tiles addressed by (column, row).
//! It is embedded at build time; decoding happens once at startup.

/// Side length of one sprite tile, in pixels.
pub const TILE_SIZE: u32 = 32;
/// Sheet grid dimensions, in tiles.
pub const SHEET_COLS: u32 = 8;
pub const SHEET_ROWS: u32 = 4;

/// Embedded sprite sheet PNG.
pub const SHEET_PNG: &[u8] = include_bytes!("../../assets/cat-sheet.png");

/// Everything the pet can be doing. Exactly one is active per tick.
///
/// `Alert` has frames in the sheet but is never entered by the state
/// machine; the compass variants are the eight chase facings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Idle,
    Alert,
    Tired,
    Sleeping,
    ScratchSelf,
    ScratchWallN,
    ScratchWallS,
    ScratchWallE,
    ScratchWallW,
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

/// Source rectangle within the sprite sheet, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl FrameRect {
    /// Normalized UV origin and extent for a sheet of the given dimensions.
    pub fn to_uv(self, sheet_w: u32, sheet_h: u32) -> [f32; 4] {
        [
            self.x as f32 / sheet_w as f32,
            self.y as f32 / sheet_h as f32,
            self.w as f32 / sheet_w as f32,
            self.h as f32 / sheet_h as f32,
        ]
    }
}

const fn tile(col: u32, row: u32) -> FrameRect {
    FrameRect {
        x: col * TILE_SIZE,
        y: row * TILE_SIZE,
        w: TILE_SIZE,
        h: TILE_SIZE,
    }
}

const IDLE: [FrameRect; 1] = [tile(3, 3)];
const ALERT: [FrameRect; 1] = [tile(7, 3)];
const TIRED: [FrameRect; 1] = [tile(3, 2)];
const SLEEPING: [FrameRect; 2] = [tile(2, 0), tile(2, 1)];
const SCRATCH_SELF: [FrameRect; 3] = [tile(5, 0), tile(6, 0), tile(7, 0)];
const SCRATCH_WALL_N: [FrameRect; 2] = [tile(0, 0), tile(0, 1)];
const SCRATCH_WALL_S: [FrameRect; 2] = [tile(7, 1), tile(6, 2)];
const SCRATCH_WALL_E: [FrameRect; 2] = [tile(2, 2), tile(2, 3)];
const SCRATCH_WALL_W: [FrameRect; 2] = [tile(4, 0), tile(4, 1)];
const NORTH: [FrameRect; 2] = [tile(1, 2), tile(1, 3)];
const NORTH_EAST: [FrameRect; 2] = [tile(0, 2), tile(0, 3)];
const EAST: [FrameRect; 2] = [tile(3, 0), tile(3, 1)];
const SOUTH_EAST: [FrameRect; 2] = [tile(5, 1), tile(5, 2)];
const SOUTH: [FrameRect; 2] = [tile(6, 3), tile(7, 2)];
const SOUTH_WEST: [FrameRect; 2] = [tile(5, 3), tile(6, 1)];
const WEST: [FrameRect; 2] = [tile(4, 2), tile(4, 3)];
const NORTH_WEST: [FrameRect; 2] = [tile(1, 0), tile(1, 1)];

/// Ordered frames for a state. Total over `AnimationState`.
pub fn frames(state: AnimationState) -> &'static [FrameRect] {
    use AnimationState::*;
    match state {
        Idle => &IDLE,
        Alert => &ALERT,
        Tired => &TIRED,
        Sleeping => &SLEEPING,
        ScratchSelf => &SCRATCH_SELF,
        ScratchWallN => &SCRATCH_WALL_N,
        ScratchWallS => &SCRATCH_WALL_S,
        ScratchWallE => &SCRATCH_WALL_E,
        ScratchWallW => &SCRATCH_WALL_W,
        N => &NORTH,
        NE => &NORTH_EAST,
        E => &EAST,
        SE => &SOUTH_EAST,
        S => &SOUTH,
        SW => &SOUTH_WEST,
        W => &WEST,
        NW => &NORTH_WEST,
    }
}

/// Frame displayed for a state at the given tick counter.
pub fn frame_for(state: AnimationState, frame_counter: u64) -> FrameRect {
    let frames = frames(state);
    frames[(frame_counter % frames.len() as u64) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [AnimationState; 17] = {
        use AnimationState::*;
        [
            Idle, Alert, Tired, Sleeping, ScratchSelf, ScratchWallN, ScratchWallS, ScratchWallE,
            ScratchWallW, N, NE, E, SE, S, SW, W, NW,
        ]
    };

    #[test]
    fn every_state_has_frames_inside_the_sheet() {
        for state in ALL_STATES {
            let frames = frames(state);
            assert!(!frames.is_empty(), "{state:?}");
            for f in frames {
                assert!(f.x + f.w <= SHEET_COLS * TILE_SIZE, "{state:?} {f:?}");
                assert!(f.y + f.h <= SHEET_ROWS * TILE_SIZE, "{state:?} {f:?}");
            }
        }
    }

    #[test]
    fn frame_counts_match_animations() {
        use AnimationState::*;
        for state in [N, NE, E, SE, S, SW, W, NW, Sleeping] {
            assert_eq!(frames(state).len(), 2, "{state:?}");
        }
        assert_eq!(frames(ScratchSelf).len(), 3);
        assert_eq!(frames(Idle).len(), 1);
        assert_eq!(frames(Tired).len(), 1);
    }

    #[test]
    fn uv_rect_is_normalized() {
        let uv = tile(3, 3).to_uv(256, 128);
        assert_eq!(uv, [96.0 / 256.0, 96.0 / 128.0, 32.0 / 256.0, 32.0 / 128.0]);
    }

    #[test]
    fn frame_for_wraps_around() {
        let frames = frames(AnimationState::ScratchSelf);
        assert_eq!(frame_for(AnimationState::ScratchSelf, 3), frames[0]);
        assert_eq!(frame_for(AnimationState::ScratchSelf, 4), frames[1]);
    }

    #[test]
    fn embedded_sheet_decodes_to_expected_dimensions() {
        let img = image::load_from_memory(SHEET_PNG).expect("sheet must decode");
        assert_eq!(img.width(), SHEET_COLS * TILE_SIZE);
        assert_eq!(img.height(), SHEET_ROWS * TILE_SIZE);
    }
}
