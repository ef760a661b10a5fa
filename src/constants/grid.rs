/// number of slots in a crafting grid.
pub const SLOT_COUNT: usize = 9;

/// edge length, in pixels, every item icon is scaled to.
pub const SLOT_SIZE: u32 = 40;

/// top-left corner of each slot, row-major.
pub const SLOT_COORDS: [(u32, u32); SLOT_COUNT] = [
    (35, 35),
    (90, 35),
    (145, 35),
    (35, 90),
    (90, 90),
    (145, 90),
    (35, 145),
    (90, 145),
    (145, 145),
];

pub const DEFAULT_TEMPLATE_SIZE: (u32, u32) = (220, 220);

pub const RESULT_ROUTE: &str = "/result";
pub const ATTACHMENT_NAME: &str = "craft.png";
