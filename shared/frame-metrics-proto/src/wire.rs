//! record bodies as they appear on the wire, one module per schema layout

/// wire types of a field key (`field_number << 3 | wire_type`)
pub mod wire_type {
    pub const VARINT: u8 = 0;
    pub const FIXED64: u8 = 1;
    pub const LENGTH_DELIMITED: u8 = 2;
    pub const START_GROUP: u8 = 3;
    pub const END_GROUP: u8 = 4;
    pub const FIXED32: u8 = 5;
}

/// Current layout, announced by a version record with major 1.
pub mod v1 {
    /// top-level record discriminants
    pub mod tag {
        pub const VERSION: u32 = 1;
        pub const SESSION_FRAME: u32 = 2;
        pub const USED: u32 = 3;
        pub const SYSTEM_FRAME: u32 = 4;
        pub const SYSTEM_GPU_INFO: u32 = 5;
        pub const SYSTEM_PRESENT_INFO: u32 = 6;
    }

    #[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
    pub struct Version {
        #[prost(uint32, tag = "1")]
        pub major: u32,
        #[prost(uint32, tag = "2")]
        pub minor: u32,
    }

    #[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
    pub struct SessionFrame {
        #[prost(int64, tag = "1")]
        pub session_id: i64,
        #[prost(int64, tag = "2")]
        pub frame_id: i64,
        #[prost(uint64, tag = "3")]
        pub predicted_frame_time_ns: u64,
        #[prost(uint64, tag = "4")]
        pub predicted_wake_up_time_ns: u64,
        #[prost(uint64, tag = "5")]
        pub predicted_gpu_done_time_ns: u64,
        #[prost(uint64, tag = "6")]
        pub predicted_display_time_ns: u64,
        #[prost(uint64, tag = "7")]
        pub predicted_display_period_ns: u64,
        #[prost(uint64, tag = "8")]
        pub display_time_ns: u64,
        #[prost(uint64, tag = "9")]
        pub when_predicted_ns: u64,
        #[prost(uint64, tag = "10")]
        pub when_wait_woke_ns: u64,
        #[prost(uint64, tag = "11")]
        pub when_begin_ns: u64,
        #[prost(uint64, tag = "12")]
        pub when_delivered_ns: u64,
        #[prost(uint64, tag = "13")]
        pub when_gpu_done_ns: u64,
        #[prost(bool, tag = "14")]
        pub discarded: bool,
    }

    #[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
    pub struct Used {
        #[prost(int64, tag = "1")]
        pub session_id: i64,
        #[prost(int64, tag = "2")]
        pub session_frame_id: i64,
        #[prost(int64, tag = "3")]
        pub system_frame_id: i64,
        #[prost(uint64, tag = "4")]
        pub when_ns: u64,
    }

    #[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
    pub struct SystemFrame {
        #[prost(int64, tag = "1")]
        pub frame_id: i64,
        #[prost(uint64, tag = "2")]
        pub predicted_display_time_ns: u64,
        #[prost(uint64, tag = "3")]
        pub predicted_display_period_ns: u64,
        #[prost(uint64, tag = "4")]
        pub desired_present_time_ns: u64,
        #[prost(uint64, tag = "5")]
        pub wake_up_time_ns: u64,
        #[prost(uint64, tag = "6")]
        pub present_slop_ns: u64,
    }

    #[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
    pub struct SystemGpuInfo {
        #[prost(int64, tag = "1")]
        pub frame_id: i64,
        #[prost(uint64, tag = "2")]
        pub start_gpu_ns: u64,
        #[prost(uint64, tag = "3")]
        pub end_gpu_ns: u64,
        #[prost(uint64, tag = "4")]
        pub when_ns: u64,
    }

    #[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
    pub struct SystemPresentInfo {
        #[prost(int64, tag = "1")]
        pub frame_id: i64,
        #[prost(uint64, tag = "2")]
        pub expected_comp_time_ns: u64,
        #[prost(uint64, tag = "3")]
        pub predicted_wake_up_time_ns: u64,
        #[prost(uint64, tag = "4")]
        pub predicted_done_time_ns: u64,
        #[prost(uint64, tag = "5")]
        pub predicted_display_time_ns: u64,
        #[prost(uint64, tag = "6")]
        pub when_predict_ns: u64,
        #[prost(uint64, tag = "7")]
        pub when_woke_ns: u64,
        #[prost(uint64, tag = "8")]
        pub when_began_ns: u64,
        #[prost(uint64, tag = "9")]
        pub when_submitted_ns: u64,
        #[prost(uint64, tag = "10")]
        pub when_infoed_ns: u64,
        #[prost(uint64, tag = "11")]
        pub desired_present_time_ns: u64,
        #[prost(uint64, tag = "12")]
        pub present_slop_ns: u64,
        #[prost(uint64, tag = "13")]
        pub present_margin_ns: u64,
        #[prost(uint64, tag = "14")]
        pub actual_present_time_ns: u64,
        #[prost(uint64, tag = "15")]
        pub earliest_present_time_ns: u64,
    }
}

/// Header-less layout written before version records existed.
///
/// Session frames share the v1 body; there is no version, used or present info record.
pub mod legacy {
    pub mod tag {
        pub const SESSION_FRAME: u32 = 1;
        pub const SYSTEM_FRAME: u32 = 2;
        pub const SYSTEM_GPU_INFO: u32 = 3;
    }

    #[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
    pub struct SystemFrame {
        #[prost(int64, tag = "1")]
        pub frame_id: i64,
    }

    #[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
    pub struct SystemGpuInfo {
        #[prost(uint64, tag = "1")]
        pub gpu_start_ns: u64,
        #[prost(uint64, tag = "2")]
        pub gpu_end_ns: u64,
    }
}
