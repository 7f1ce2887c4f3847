//! Built-in framework counter enumerations
//!
//! Ordinals are part of the wire format: new counters may only be appended.

use crate::counter_enum;

counter_enum! {
    /// Per-task counters maintained by the framework
    pub enum TaskCounter in "tally.TaskCounter" {
        MapInputRecords = "MAP_INPUT_RECORDS",
        MapOutputRecords = "MAP_OUTPUT_RECORDS",
        MapSkippedRecords = "MAP_SKIPPED_RECORDS",
        MapOutputBytes = "MAP_OUTPUT_BYTES",
        MapOutputMaterializedBytes = "MAP_OUTPUT_MATERIALIZED_BYTES",
        SplitRawBytes = "SPLIT_RAW_BYTES",
        CombineInputRecords = "COMBINE_INPUT_RECORDS",
        CombineOutputRecords = "COMBINE_OUTPUT_RECORDS",
        ReduceInputGroups = "REDUCE_INPUT_GROUPS",
        ReduceShuffleBytes = "REDUCE_SHUFFLE_BYTES",
        ReduceInputRecords = "REDUCE_INPUT_RECORDS",
        ReduceOutputRecords = "REDUCE_OUTPUT_RECORDS",
        ReduceSkippedGroups = "REDUCE_SKIPPED_GROUPS",
        ReduceSkippedRecords = "REDUCE_SKIPPED_RECORDS",
        SpilledRecords = "SPILLED_RECORDS",
        ShuffledMaps = "SHUFFLED_MAPS",
        FailedShuffle = "FAILED_SHUFFLE",
        MergedMapOutputs = "MERGED_MAP_OUTPUTS",
        /// Garbage collection time in milliseconds
        GcTimeMillis = "GC_TIME_MILLIS",
        CpuMilliseconds = "CPU_MILLISECONDS",
        PhysicalMemoryBytes = "PHYSICAL_MEMORY_BYTES",
        VirtualMemoryBytes = "VIRTUAL_MEMORY_BYTES",
        CommittedHeapBytes = "COMMITTED_HEAP_BYTES",
    }
}

counter_enum! {
    /// Per-job counters maintained by the scheduler side of the framework
    pub enum JobCounter in "tally.JobCounter" {
        NumFailedMaps = "NUM_FAILED_MAPS",
        NumFailedReduces = "NUM_FAILED_REDUCES",
        NumKilledMaps = "NUM_KILLED_MAPS",
        NumKilledReduces = "NUM_KILLED_REDUCES",
        TotalLaunchedMaps = "TOTAL_LAUNCHED_MAPS",
        TotalLaunchedReduces = "TOTAL_LAUNCHED_REDUCES",
        OtherLocalMaps = "OTHER_LOCAL_MAPS",
        DataLocalMaps = "DATA_LOCAL_MAPS",
        RackLocalMaps = "RACK_LOCAL_MAPS",
        SlotsMillisMaps = "SLOTS_MILLIS_MAPS",
        SlotsMillisReduces = "SLOTS_MILLIS_REDUCES",
        FallowSlotsMillisMaps = "FALLOW_SLOTS_MILLIS_MAPS",
        FallowSlotsMillisReduces = "FALLOW_SLOTS_MILLIS_REDUCES",
        TotalLaunchedUbertasks = "TOTAL_LAUNCHED_UBERTASKS",
        NumUberSubmaps = "NUM_UBER_SUBMAPS",
        NumUberSubreduces = "NUM_UBER_SUBREDUCES",
        NumFailedUbertasks = "NUM_FAILED_UBERTASKS",
        MillisMaps = "MILLIS_MAPS",
        MillisReduces = "MILLIS_REDUCES",
        VcoresMillisMaps = "VCORES_MILLIS_MAPS",
        VcoresMillisReduces = "VCORES_MILLIS_REDUCES",
        MbMillisMaps = "MB_MILLIS_MAPS",
        MbMillisReduces = "MB_MILLIS_REDUCES",
    }
}
