//! The table of OS-9 `F$`/`I$` system calls reachable through `swi2`.
//!
//! Ported from the reference implementation's `os9calls.c`. The service
//! number is the byte immediately following the `swi2` opcode (spec.md
//! §4.D); unused slots are reserved and have no name.

/// One system call's short name and one-line description.
pub struct Os9Call {
    pub name: &'static str,
    pub description: &'static str,
}

const fn call(name: &'static str, description: &'static str) -> Option<Os9Call> {
    Some(Os9Call { name, description })
}

/// Indexed by service number (the byte following `swi2`).
pub const OS9_CALLS: [Option<Os9Call>; 145] = [
    call("F$Link", "Link to Module"),
    call("F$Load", "Load Module from File"),
    call("F$UnLink", "Unlink Module"),
    call("F$Fork", "Start New Process"),
    call("F$Wait", "Wait for Child Process to Die"),
    call("F$Chain", "Chain Process to New Module"),
    call("F$Exit", "Terminate Process"),
    call("F$Mem", "Set Memory Size"),
    call("F$Send", "Send Signal to Process"),
    call("F$Icpt", "Set Signal Intercept"),
    call("F$Sleep", "Suspend Process"),
    call("F$SSpd", "Suspend Process"),
    call("F$ID", "Return Process ID"),
    call("F$SPrior", "Set Process Priority"),
    call("F$SSWI", "Set Software Interrupt"),
    call("F$PErr", "Print Error"),
    call("F$PrsNam", "Parse Pathlist Name"),
    call("F$CmpNam", "Compare Two Names"),
    call("F$SchBit", "Search Bit Map"),
    call("F$AllBit", "Allocate in Bit Map"),
    call("F$DelBit", "Deallocate in Bit Map"),
    call("F$Time", "Get Current Time"),
    call("F$STime", "Set Current Time"),
    call("F$CRC", "Generate CRC"),
    call("F$GPrDsc", "get Process Descriptor copy"),
    call("F$GBlkMp", "get System Block Map copy"),
    call("F$GModDr", "get Module Directory copy"),
    call("F$CpyMem", "Copy External Memory"),
    call("F$SUser", "Set User ID number"),
    call("F$UnLoad", "Unlink Module by name"),
    call("F$Alarm", "Color Computer Alarm Call"),
    None,
    None,
    call("F$NMLink", "Color Computer NonMapping Link"),
    call("F$NMLoad", "Color Computer NonMapping Load"),
    None,
    None,
    None,
    None,
    call("F$VIRQ", "Install/Delete Virtual IRQ"),
    call("F$SRqMem", "System Memory Request"),
    call("F$SRtMem", "System Memory Return"),
    call("F$IRQ", "Enter IRQ Polling Table"),
    call("F$IOQu", "Enter I/O Queue"),
    call("F$AProc", "Enter Active Process Queue"),
    call("F$NProc", "Start Next Process"),
    call("F$VModul", "Validate Module"),
    call("F$Find64", "Find Process/Path Descriptor"),
    call("F$All64", "Allocate Process/Path Descriptor"),
    call("F$Ret64", "Return Process/Path Descriptor"),
    call("F$SSvc", "Service Request Table Initialization"),
    call("F$IODel", "Delete I/O Module"),
    call("F$SLink", "System Link"),
    call("F$Boot", "Bootstrap System"),
    call("F$BtMem", "Bootstrap Memory Request"),
    call("F$GProcP", "Get Process ptr"),
    call("F$Move", "Move Data (low bound first)"),
    call("F$AllRAM", "Allocate RAM blocks"),
    call("F$AllImg", "Allocate Image RAM blocks"),
    call("F$DelImg", "Deallocate Image RAM blocks"),
    call("F$SetImg", "Set Process DAT Image"),
    call("F$FreeLB", "Get Free Low Block"),
    call("F$FreeHB", "Get Free High Block"),
    call("F$AllTsk", "Allocate Process Task number"),
    call("F$DelTsk", "Deallocate Process Task number"),
    call("F$SetTsk", "Set Process Task DAT registers"),
    call("F$ResTsk", "Reserve Task number"),
    call("F$RelTsk", "Release Task number"),
    call("F$DATLog", "Convert DAT Block/Offset to Logical"),
    call("F$DATTmp", "Make temporary DAT image (Obsolete)"),
    call("F$LDAXY", "Load A [X,[Y]]"),
    call("F$LDAXYP", "Load A [X+,[Y]]"),
    call("F$LDDDXY", "Load D [D+X,[Y]]"),
    call("F$LDABX", "Load A from 0,X in task B"),
    call("F$STABX", "Store A at 0,X in task B"),
    call("F$AllPrc", "Allocate Process Descriptor"),
    call("F$DelPrc", "Deallocate Process Descriptor"),
    call("F$ELink", "Link using Module Directory Entry"),
    call("F$FModul", "Find Module Directory Entry"),
    call("F$MapBlk", "Map Specific Block"),
    call("F$ClrBlk", "Clear Specific Block"),
    call("F$DelRAM", "Deallocate RAM blocks"),
    call("F$GCMDir", "Pack module directory"),
    call("F$AlHRam", "Allocate HIGH RAM Blocks"),
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    call("I$Attach", "Attach I/O Device"),
    call("I$Detach", "Detach I/O Device"),
    call("I$Dup", "Duplicate Path"),
    call("I$Create", "Create New File"),
    call("I$Open", "Open Existing File"),
    call("I$MakDir", "Make Directory File"),
    call("I$ChgDir", "Change Default Directory"),
    call("I$Delete", "Delete File"),
    call("I$Seek", "Change Current Position"),
    call("I$Read", "Read Data"),
    call("I$Write", "Write Data"),
    call("I$ReadLn", "Read Line of ASCII Data"),
    call("I$WritLn", "Write Line of ASCII Data"),
    call("I$GetStt", "Get Path Status"),
    call("I$SetStt", "Set Path Status"),
    call("I$Close", "Close Path"),
    call("I$DeletX", "Delete from current exec dir"),
];

/// Look up a service number, returning `None` for reserved slots and for
/// numbers past the end of the table.
pub fn lookup(service: u8) -> Option<&'static Os9Call> {
    OS9_CALLS.get(service as usize).and_then(|c| c.as_ref())
}
