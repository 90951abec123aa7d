// Screenplay fixtures with known structure
// WHY: Deterministic inputs with hand-checked scene and character expectations

#![allow(dead_code)]

/// Two scenes, one speaker each
pub const TWO_SCENES: &str = "INT. KITCHEN - DAY
JOHN
Hello there.

EXT. PARK - NIGHT
JANE
Goodbye.";

/// Title page, transitions, extensions, action mentions and a mixed setting
pub const SHORT_FILM: &str = "THE LAST TRAIN
Written by A. Writer

FADE IN:

1 EXT. TRAIN STATION - NIGHT

Rain hammers the platform. MARGARET (60s) waits alone.

MARGARET
Late again.

CONDUCTOR (O.S.)
All aboard!

MARGARET
(to herself)
Finally.

CUT TO:

2 INT./EXT. TRAIN CAR - CONTINUOUS

The CONDUCTOR punches tickets. Margaret finds a seat.

CONDUCTOR
Ticket, ma'am.

MARGARET (CONT'D)
Here you are.

INT. DINING CAR (LATER)

Empty tables. The CONDUCTOR pours coffee.

FADE OUT.

THE END";

/// Prose with no scene headings at all
pub const PROSE: &str = "It was a dark and stormy night.
The rain fell in torrents.
JOHN
Nobody answered.";

/// Heading variants with scene numbers, bare settings and dash styles
pub const HEADING_VARIANTS: &str = "12A INT. OFFICE - MORNING
BOSS
Sit.

EXT. ROOFTOP \u{2013} DUSK
Wind.

INT HALLWAY - SAME TIME
Footsteps.

int. basement - night
Dripping water.";
