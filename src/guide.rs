//! Complaint channel reference shown next to an empty sheet

use std::fmt::Write as _;

/// One way of filing a complaint
#[derive(Debug, PartialEq, Eq)]
pub struct ComplaintMethod {
    pub name: &'static str,
    pub steps: &'static [&'static str],
    pub contact: &'static str,
    pub notes: &'static str,
}

const METHODS: &[ComplaintMethod] = &[
    ComplaintMethod {
        name: "12333劳动监察大队投诉",
        steps: &[
            "拨打12333热线",
            "选择人工服务",
            "提供个人信息和投诉内容",
            "记录投诉编号以便查询进度",
        ],
        contact: "12333热线",
        notes: "工作日9:00-17:00提供服务",
    },
    ComplaintMethod {
        name: "欠薪线索反馈小程序",
        steps: &[
            "微信搜索'欠薪线索反馈'小程序",
            "注册并登录账号",
            "填写欠薪详细信息",
            "上传相关证据材料",
            "提交并等待处理",
        ],
        contact: "微信小程序",
        notes: "需提供劳动合同或工资条等证明",
    },
    ComplaintMethod {
        name: "个人所得税申诉",
        steps: &[
            "登录个人所得税APP",
            "进入'服务'-'收入纳税明细查询'",
            "选择有异议的记录点击'申诉'",
            "填写申诉理由并提交",
            "等待税务部门核实",
        ],
        contact: "个人所得税APP",
        notes: "申诉后一般15个工作日内处理",
    },
    ComplaintMethod {
        name: "劳动仲裁",
        steps: &[
            "准备仲裁申请书和相关证据",
            "到当地劳动人事争议仲裁委员会提交申请",
            "等待受理通知书",
            "参加仲裁庭审",
            "领取仲裁裁决书",
        ],
        contact: "当地劳动仲裁委员会",
        notes: "时效为争议发生之日起1年内",
    },
    ComplaintMethod {
        name: "法院诉讼",
        steps: &[
            "准备起诉状和证据材料",
            "到有管辖权的人民法院立案",
            "缴纳诉讼费",
            "等待开庭通知",
            "参加庭审",
            "等待判决结果",
        ],
        contact: "人民法院",
        notes: "建议先咨询专业律师",
    },
    ComplaintMethod {
        name: "961193消防举报",
        steps: &[
            "拨打96119举报电话",
            "详细说明消防隐患情况",
            "提供隐患地点信息",
            "可要求匿名举报",
            "等待消防部门核查",
        ],
        contact: "96119热线",
        notes: "24小时受理举报",
    },
    ComplaintMethod {
        name: "投诉不缴纳社保",
        steps: &[
            "收集工资流水等劳动关系证明",
            "到当地社保稽核部门投诉",
            "填写投诉登记表",
            "配合调查核实",
            "等待处理结果",
        ],
        contact: "社保局稽核科",
        notes: "可同时向劳动监察投诉",
    },
    ComplaintMethod {
        name: "举报偷税漏税",
        steps: &[
            "收集相关证据材料",
            "到税务机关稽查局举报",
            "填写举报登记表",
            "可选择实名或匿名",
            "等待税务部门查处",
        ],
        contact: "12366纳税服务热线",
        notes: "查实后可获得奖励",
    },
];

/// All methods in display order
pub fn methods() -> &'static [ComplaintMethod] {
    METHODS
}

pub fn lookup(name: &str) -> Option<&'static ComplaintMethod> {
    METHODS.iter().find(|m| m.name == name)
}

impl ComplaintMethod {
    /// Plain-text card: name, numbered steps, contact and notes
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.name);
        let _ = writeln!(out);
        let _ = writeln!(out, "操作步骤：");
        for (i, step) in self.steps.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", i + 1, step);
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "联系方式：{}", self.contact);
        let _ = writeln!(out, "注意事项：{}", self.notes);
        out
    }
}
