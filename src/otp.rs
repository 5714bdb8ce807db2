//! 邮箱验证码输入
//!
//! 六个单字符输入框加一个重发倒计时。倒计时只是界面上的冷却，
//! 验证码的有效期与尝试次数完全由服务端决定。

use crate::error::ValidationError;

pub const OTP_LENGTH: usize = 6;

/// 六格验证码输入状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtpInput {
    digits: [Option<char>; OTP_LENGTH],
    focus: usize,
}

impl OtpInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn digit(&self, index: usize) -> Option<char> {
        self.digits.get(index).copied().flatten()
    }

    /// 当前应获得焦点的格子
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// 某一格的输入事件
    ///
    /// 只取最后一个字符（覆盖粘贴进来的旧值），非数字输入被忽略，
    /// 清空输入会清空该格。填入数字后焦点移到下一格，其余情况焦点留在该格。
    pub fn input(&mut self, index: usize, value: &str) {
        if index >= OTP_LENGTH {
            return;
        }
        self.focus = index;
        match value.chars().last() {
            None => self.digits[index] = None,
            Some(c) if c.is_ascii_digit() => {
                self.digits[index] = Some(c);
                if index < OTP_LENGTH - 1 {
                    self.focus = index + 1;
                }
            }
            Some(_) => {}
        }
    }

    /// 退格：当前格已空时焦点回到上一格，否则留在当前格等待清空
    pub fn backspace(&mut self, index: usize) {
        if index >= OTP_LENGTH {
            return;
        }
        self.focus = if self.digits[index].is_none() && index > 0 {
            index - 1
        } else {
            index
        };
    }

    pub fn is_complete(&self) -> bool {
        self.digits.iter().all(Option::is_some)
    }

    /// 拼接完整验证码，未填满则在本地拒绝
    pub fn code(&self) -> Result<String, ValidationError> {
        if !self.is_complete() {
            return Err(ValidationError::new("Please enter the full 6-digit code"));
        }
        Ok(self.digits.iter().flatten().collect())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// 重发冷却倒计时，每秒 `tick` 一次
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    total: u32,
    remaining: u32,
}

impl Countdown {
    /// 新建即开始计时
    pub fn new(total: u32) -> Self {
        Self {
            total,
            remaining: total,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// 走一秒；返回是否仍在计时
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining > 0
    }

    pub fn reset(&mut self) {
        self.remaining = self.total;
    }

    pub fn can_resend(&self) -> bool {
        self.remaining == 0
    }
}
