use x86_64::{
    structures::paging::{FrameAllocator, PhysFrame, Size4KiB},
    PhysAddr,
};

/// A simple bump allocator for physical memory frames.
///
/// Only create-mode walks allocate; the inspection commands never touch it.
pub struct BumpFrameAllocator {
    next_free_frame: PhysFrame,
    end_frame: PhysFrame,
}

impl BumpFrameAllocator {
    /// Create an allocator with no frames to hand out.
    pub fn empty() -> Self {
        let zero = PhysFrame::containing_address(PhysAddr::new(0));
        BumpFrameAllocator {
            next_free_frame: zero,
            end_frame: zero,
        }
    }

    /// Hand out frames in `[start, end)`.
    ///
    /// # Safety
    /// The range must be unused RAM that nothing else will claim.
    pub unsafe fn new(start: PhysAddr, end: PhysAddr) -> Self {
        BumpFrameAllocator {
            next_free_frame: PhysFrame::containing_address(start.align_up(4096u64)),
            end_frame: PhysFrame::containing_address(end.align_down(4096u64)),
        }
    }

    pub fn remaining(&self) -> u64 {
        if self.next_free_frame >= self.end_frame {
            return 0;
        }
        (self.end_frame.start_address() - self.next_free_frame.start_address()) / 4096
    }
}

unsafe impl FrameAllocator<Size4KiB> for BumpFrameAllocator {
    fn allocate_frame(&mut self) -> Option<PhysFrame> {
        if self.next_free_frame < self.end_frame {
            let frame = self.next_free_frame;
            self.next_free_frame += 1;
            Some(frame)
        } else {
            None
        }
    }
}
