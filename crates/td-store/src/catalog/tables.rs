//! Table, column, index, and view definitions of the current schema.
//!
//! Column constants introduced by a delta (see [`crate::delta`]) are shared
//! with the delta registry so both describe the column identically.

use super::{ColumnDef, ColumnRef, IndexDef, TableDef, ViewColumn, ViewDef, ViewJoin};

/// Task lists: the root of ownership.
pub mod lists {
    use super::*;

    pub const TABLE: &str = "Lists";

    pub const ID: &str = "_id";
    pub const ACCOUNT_NAME: &str = "account_name";
    pub const ACCOUNT_TYPE: &str = "account_type";
    pub const LIST_NAME: &str = "list_name";
    pub const LIST_COLOR: &str = "list_color";
    pub const ACCESS_LEVEL: &str = "list_access_level";
    pub const VISIBLE: &str = "visible";
    pub const SYNC_ENABLED: &str = "sync_enabled";
    pub const OWNER: &str = "list_owner";
    /// Cumulative count of dirty/deleted events among the list's tasks.
    pub const DIRTY: &str = "_dirty";
    pub const SYNC_ID: &str = "_sync_id";
    pub const SYNC_VERSION: &str = "sync_version";

    pub(crate) const DEF: TableDef = TableDef {
        name: TABLE,
        columns: &[
            ColumnDef::identity(ID),
            ColumnDef::text(ACCOUNT_NAME),
            ColumnDef::text(ACCOUNT_TYPE),
            ColumnDef::text(LIST_NAME),
            ColumnDef::integer(LIST_COLOR),
            ColumnDef::integer(ACCESS_LEVEL),
            ColumnDef::integer(VISIBLE),
            ColumnDef::integer(SYNC_ENABLED),
            ColumnDef::text(OWNER),
            ColumnDef::integer(DIRTY).default_value("0"),
            ColumnDef::text(SYNC_ID),
            ColumnDef::text(SYNC_VERSION),
            ColumnDef::text("sync1"),
            ColumnDef::text("sync2"),
            ColumnDef::text("sync3"),
            ColumnDef::text("sync4"),
            ColumnDef::text("sync5"),
            ColumnDef::text("sync6"),
            ColumnDef::text("sync7"),
            ColumnDef::text("sync8"),
        ],
    };
}

/// Tasks, each owned by exactly one list.
pub mod tasks {
    use super::*;

    pub const TABLE: &str = "Tasks";

    pub const ID: &str = "_id";
    pub const LIST_ID: &str = "list_id";
    pub const TITLE: &str = "title";
    pub const STATUS: &str = "status";
    pub const DTSTART: &str = "dtstart";
    pub const DUE: &str = "due";
    pub const DIRTY: &str = "_dirty";
    pub const DELETED: &str = "_deleted";
    pub const SYNC_ID: &str = "_sync_id";

    /// Added in v2.
    pub const IS_NEW: ColumnDef = ColumnDef::integer("is_new");
    /// Added in v2.
    pub const IS_CLOSED: ColumnDef = ColumnDef::integer("is_closed");

    pub(crate) const DEF: TableDef = TableDef {
        name: TABLE,
        columns: &[
            ColumnDef::identity(ID),
            ColumnDef::integer(LIST_ID).not_null(),
            ColumnDef::text(TITLE),
            ColumnDef::text("location"),
            ColumnDef::text("geo"),
            ColumnDef::text("description"),
            ColumnDef::text("url"),
            ColumnDef::text("organizer"),
            ColumnDef::integer("priority"),
            ColumnDef::integer("task_color"),
            ColumnDef::integer("class"),
            ColumnDef::integer("completed"),
            ColumnDef::integer("completed_is_allday"),
            ColumnDef::integer("percent_complete"),
            ColumnDef::integer(STATUS).default_value("0"),
            IS_NEW,
            IS_CLOSED,
            ColumnDef::integer(DTSTART),
            ColumnDef::integer("created"),
            ColumnDef::integer("last_modified"),
            ColumnDef::integer("is_allday"),
            ColumnDef::text("tz"),
            ColumnDef::integer(DUE),
            ColumnDef::text("duration"),
            ColumnDef::text("rdate"),
            ColumnDef::text("exdate"),
            ColumnDef::text("rrule"),
            ColumnDef::text("original_instance_sync_id"),
            ColumnDef::integer("original_instance_id"),
            ColumnDef::integer("original_instance_time"),
            ColumnDef::integer("original_instance_allday"),
            // a new task is always dirty and never deleted
            ColumnDef::integer(DIRTY).default_value("1"),
            ColumnDef::integer(DELETED).default_value("0"),
            ColumnDef::text(SYNC_ID),
            ColumnDef::text("sync_version"),
            ColumnDef::text("sync1"),
            ColumnDef::text("sync2"),
            ColumnDef::text("sync3"),
            ColumnDef::text("sync4"),
            ColumnDef::text("sync5"),
            ColumnDef::text("sync6"),
            ColumnDef::text("sync7"),
            ColumnDef::text("sync8"),
        ],
    };
}

/// Materialized occurrences of a task.
pub mod instances {
    use super::*;

    pub const TABLE: &str = "Instances";

    pub const ID: &str = "_id";
    pub const TASK_ID: &str = "task_id";
    pub const START: &str = "instance_start";
    pub const DUE: &str = "instance_due";
    pub const DURATION: &str = "instance_duration";

    /// Added in v3.
    pub const START_SORTING: ColumnDef = ColumnDef::integer("instance_start_sorting");
    /// Added in v3.
    pub const DUE_SORTING: ColumnDef = ColumnDef::integer("instance_due_sorting");

    pub(crate) const DEF: TableDef = TableDef {
        name: TABLE,
        columns: &[
            ColumnDef::identity(ID),
            ColumnDef::integer(TASK_ID).not_null(),
            ColumnDef::integer(START),
            ColumnDef::integer(DUE),
            START_SORTING,
            DUE_SORTING,
            ColumnDef::integer(DURATION),
        ],
    };
}

/// Categories. Independent lifecycle, never cascaded.
pub mod categories {
    use super::*;

    pub const TABLE: &str = "Categories";

    pub(crate) const DEF: TableDef = TableDef {
        name: TABLE,
        columns: &[
            ColumnDef::identity("_id"),
            ColumnDef::text("account_name"),
            ColumnDef::text("account_type"),
            ColumnDef::text("name"),
            ColumnDef::integer("color"),
        ],
    };
}

/// Typed extension records attached to a task (alarms, attendees, ...).
pub mod properties {
    use super::*;

    pub const TABLE: &str = "Properties";

    pub const ID: &str = "_id";
    pub const TASK_ID: &str = "task_id";
    pub const MIMETYPE: &str = "mimetype";

    pub(crate) const DEF: TableDef = TableDef {
        name: TABLE,
        columns: &[
            ColumnDef::identity(ID),
            ColumnDef::integer(TASK_ID),
            ColumnDef::integer(MIMETYPE),
            ColumnDef::integer("prop_version"),
            ColumnDef::text("data0"),
            ColumnDef::text("data1"),
            ColumnDef::text("data2"),
            ColumnDef::text("data3"),
            ColumnDef::text("data4"),
            ColumnDef::text("data5"),
            ColumnDef::text("data6"),
            ColumnDef::text("data7"),
            ColumnDef::text("data8"),
            ColumnDef::text("data9"),
            ColumnDef::text("data10"),
            ColumnDef::text("data11"),
            ColumnDef::text("data12"),
            ColumnDef::text("data13"),
            ColumnDef::text("data14"),
            ColumnDef::text("data15"),
            ColumnDef::text("prop_sync1"),
            ColumnDef::text("prop_sync2"),
            ColumnDef::text("prop_sync3"),
            ColumnDef::text("prop_sync4"),
        ],
    };
}

pub const TASK_VIEW: &str = "Task_View";
pub const INSTANCE_VIEW: &str = "Instance_View";

pub(crate) static TABLES: &[TableDef] = &[
    lists::DEF,
    tasks::DEF,
    instances::DEF,
    categories::DEF,
    properties::DEF,
];

pub(crate) static INDICES: &[IndexDef] = &[
    IndexDef {
        table: instances::TABLE,
        columns: &[instances::TASK_ID, instances::START, instances::DUE],
    },
    IndexDef {
        table: lists::TABLE,
        columns: &[lists::ACCOUNT_NAME, lists::ACCOUNT_TYPE],
    },
    IndexDef {
        table: tasks::TABLE,
        columns: &[tasks::STATUS, tasks::LIST_ID, tasks::SYNC_ID],
    },
];

/// List columns denormalized into every task-centric view.
const LIST_PROJECTION: [ViewColumn; 7] = [
    ViewColumn::Column(ColumnRef::new(lists::TABLE, lists::ACCOUNT_NAME)),
    ViewColumn::Column(ColumnRef::new(lists::TABLE, lists::ACCOUNT_TYPE)),
    ViewColumn::Column(ColumnRef::new(lists::TABLE, lists::OWNER)),
    ViewColumn::Column(ColumnRef::new(lists::TABLE, lists::LIST_NAME)),
    ViewColumn::Column(ColumnRef::new(lists::TABLE, lists::ACCESS_LEVEL)),
    ViewColumn::Column(ColumnRef::new(lists::TABLE, lists::LIST_COLOR)),
    ViewColumn::Column(ColumnRef::new(lists::TABLE, lists::VISIBLE)),
];

const TASK_LIST_JOIN: ViewJoin = ViewJoin {
    table: lists::TABLE,
    left: ColumnRef::new(tasks::TABLE, tasks::LIST_ID),
    right: ColumnRef::new(lists::TABLE, lists::ID),
};

pub(crate) static VIEWS: &[ViewDef] = &[
    ViewDef {
        name: TASK_VIEW,
        from: tasks::TABLE,
        joins: &[TASK_LIST_JOIN],
        columns: &[
            ViewColumn::AllOf(tasks::TABLE),
            LIST_PROJECTION[0],
            LIST_PROJECTION[1],
            LIST_PROJECTION[2],
            LIST_PROJECTION[3],
            LIST_PROJECTION[4],
            LIST_PROJECTION[5],
            LIST_PROJECTION[6],
        ],
    },
    ViewDef {
        name: INSTANCE_VIEW,
        from: tasks::TABLE,
        joins: &[
            TASK_LIST_JOIN,
            ViewJoin {
                table: instances::TABLE,
                left: ColumnRef::new(tasks::TABLE, tasks::ID),
                right: ColumnRef::new(instances::TABLE, instances::TASK_ID),
            },
        ],
        columns: &[
            ViewColumn::AllOf(instances::TABLE),
            ViewColumn::AllOf(tasks::TABLE),
            LIST_PROJECTION[0],
            LIST_PROJECTION[1],
            LIST_PROJECTION[2],
            LIST_PROJECTION[3],
            LIST_PROJECTION[4],
            LIST_PROJECTION[5],
            LIST_PROJECTION[6],
        ],
    },
];
