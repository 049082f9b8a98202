pub const TECHNICAL_SKILLS: &[&str] = &[
    // Languages
    "Python", "Java", "JavaScript", "TypeScript", "C", "C++", "C#", "Go", "Rust", "Ruby",
    "PHP", "Swift", "Kotlin", "Scala", "R", "MATLAB", "Perl", "SQL", "PL/SQL", "Bash",
    "PowerShell", "HTML", "CSS", "Dart", "Objective-C", "Haskell", "Lua", "Julia", "Groovy",
    "VBA", "SAS",
    // Web
    "React", "Angular", "Vue.js", "Node.js", "Express", "Django", "Flask", "FastAPI",
    "Spring", "Spring Boot", "Ruby on Rails", "ASP.NET", ".NET", "jQuery", "Bootstrap",
    "Tailwind CSS", "Next.js", "GraphQL", "REST APIs", "Redux", "Webpack",
    // Data science
    "Machine Learning", "Deep Learning", "Artificial Intelligence",
    "Natural Language Processing", "Computer Vision", "Data Analysis", "Data Mining",
    "Data Visualization", "Data Modeling", "Statistics", "TensorFlow", "PyTorch", "Keras",
    "scikit-learn", "Pandas", "NumPy", "SciPy", "Matplotlib", "Tableau", "Power BI", "Excel",
    "Hadoop", "Apache Spark", "Big Data", "ETL",
    // Cloud and operations
    "AWS", "Azure", "Google Cloud", "Docker", "Kubernetes", "Terraform", "Ansible",
    "Jenkins", "CI/CD", "DevOps", "Linux", "Unix", "Cloud Computing", "Microservices",
    "Serverless", "GitHub Actions", "Nginx",
    // Databases
    "MySQL", "PostgreSQL", "MongoDB", "Oracle", "SQL Server", "SQLite", "Redis",
    "Cassandra", "DynamoDB", "Elasticsearch", "Firebase", "NoSQL", "Database Design",
    "Database Management", "Database Management Systems", "Database Administration",
    "Database Security", "Database Optimization", "Relational Databases",
    "Entity Relationship Diagrams", "Data Normalization", "Performance Tuning",
    "Query Optimization",
    // Mobile
    "Android", "iOS", "React Native", "Flutter", "Xamarin",
    // Version control
    "Git", "GitHub", "GitLab", "Bitbucket", "SVN", "Version Control",
    // Design
    "Figma", "Sketch", "Adobe Photoshop", "Adobe Illustrator", "UI/UX Design", "AutoCAD",
    // Office and business tools
    "Microsoft Office", "PowerPoint", "SharePoint", "Jira", "Confluence", "Salesforce", "SAP",
    // Practices and fields
    "Networking", "Cybersecurity", "Information Security", "Penetration Testing", "Agile",
    "Scrum", "Software Engineering", "Web Development", "Mobile Development",
    "Distributed Systems", "Operating Systems", "Unit Testing", "Selenium", "TCP/IP",
    "Blockchain",
];

pub const SOFT_SKILLS: &[&str] = &[
    "Communication", "Leadership", "Teamwork", "Problem Solving", "Critical Thinking",
    "Time Management", "Project Management", "Adaptability", "Creativity", "Collaboration",
    "Attention to Detail", "Organization", "Interpersonal Skills", "Presentation Skills",
    "Public Speaking", "Negotiation", "Conflict Resolution", "Decision Making",
    "Emotional Intelligence", "Customer Service", "Mentoring", "Strategic Planning",
    "Stakeholder Management", "Analytical Skills", "Multitasking", "Work Ethic",
];

pub const INDUSTRY_SKILLS: &[(&str, &[&str])] = &[
    (
        "healthcare",
        &[
            "Patient Care", "Electronic Health Records", "HIPAA", "Medical Terminology",
            "Clinical Research", "Phlebotomy", "CPR", "Medical Coding", "Nursing", "Pharmacology",
        ],
    ),
    (
        "finance",
        &[
            "Financial Analysis", "Accounting", "Bookkeeping", "Budgeting", "Financial Modeling",
            "Risk Management", "Auditing", "Taxation", "QuickBooks", "Forecasting",
            "Investment Management",
        ],
    ),
    (
        "education",
        &[
            "Curriculum Development", "Lesson Planning", "Classroom Management",
            "Instructional Design", "Student Assessment", "Special Education", "E-Learning",
        ],
    ),
    (
        "legal",
        &[
            "Legal Research", "Contract Law", "Litigation", "Compliance", "Regulatory Affairs",
            "Legal Writing", "Intellectual Property",
        ],
    ),
    (
        "marketing",
        &[
            "SEO", "SEM", "Content Marketing", "Social Media Marketing", "Email Marketing",
            "Google Analytics", "Brand Management", "Market Research", "Digital Marketing",
            "Copywriting",
        ],
    ),
    (
        "sales",
        &[
            "Lead Generation", "Account Management", "CRM", "Cold Calling", "Sales Forecasting",
            "Business Development", "Customer Relationship Management",
        ],
    ),
];

pub const ABBREVIATIONS: &[(&str, &str)] = &[
    ("js", "JavaScript"),
    ("ts", "TypeScript"),
    ("py", "Python"),
    ("golang", "Go"),
    ("k8s", "Kubernetes"),
    ("postgres", "PostgreSQL"),
    ("mongo", "MongoDB"),
    ("gcp", "Google Cloud"),
    ("google cloud platform", "Google Cloud"),
    ("amazon web services", "AWS"),
    ("microsoft azure", "Azure"),
    ("cpp", "C++"),
    ("c sharp", "C#"),
    ("reactjs", "React"),
    ("react.js", "React"),
    ("sklearn", "scikit-learn"),
    ("ml", "Machine Learning"),
    ("ai", "Artificial Intelligence"),
    ("nlp", "Natural Language Processing"),
    ("ms office", "Microsoft Office"),
    ("ms excel", "Excel"),
    ("microsoft excel", "Excel"),
    ("powerbi", "Power BI"),
    ("rest api", "REST APIs"),
    ("restful apis", "REST APIs"),
    ("ehr", "Electronic Health Records"),
    ("crm software", "CRM"),
];

pub const GENERIC_WORDS: &[&str] = &[
    "data", "system", "systems", "management", "development", "design", "analysis",
    "software", "business", "project", "team", "web", "cloud", "digital", "social",
    "content", "customer", "market", "financial", "legal", "medical", "patient", "student",
    "special", "public", "problem", "critical", "time", "next", "power", "google",
    "microsoft", "adobe", "apache", "contract", "email", "account", "sales", "lead", "cold",
    "brand", "risk", "intellectual", "strategic", "emotional", "conflict", "decision",
    "attention", "work", "machine", "deep", "natural", "computer", "artificial",
    "information", "version", "unit", "operating", "distributed", "mobile", "relational",
    "database", "rest", "performance", "query", "entity", "penetration", "investment",
    "clinical", "lesson", "classroom", "instructional", "regulatory", "electronic",
];

pub const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "of", "to", "in", "on", "for", "with", "by", "at", "from",
];

pub const TECH_STACKS: &[(&str, &[&str])] = &[
    ("web_frontend", &["HTML", "CSS", "JavaScript", "TypeScript", "React", "Angular", "Vue.js"]),
    (
        "web_backend",
        &["Node.js", "Express", "Django", "Flask", "Spring", "Ruby on Rails", "PHP", "ASP.NET"],
    ),
    (
        "data_science",
        &["Python", "R", "SQL", "Pandas", "NumPy", "scikit-learn", "TensorFlow", "PyTorch", "Tableau"],
    ),
    ("database", &["SQL", "MySQL", "PostgreSQL", "MongoDB", "Oracle", "Redis"]),
    ("cloud", &["AWS", "Azure", "Google Cloud", "Docker", "Kubernetes", "Terraform"]),
    ("mobile", &["Swift", "Kotlin", "Java", "React Native", "Flutter", "Android", "iOS"]),
];

pub const INDUSTRY_KEYWORDS: &[(&str, &[&str])] = &[
    ("technology", &["programming", "development", "software", "database", "cloud", "devops"]),
    ("healthcare", &["patient", "medical", "clinical", "health", "diagnosis", "treatment"]),
    ("finance", &["financial", "accounting", "banking", "investment", "budget", "analysis"]),
    ("education", &["teaching", "curriculum", "instruction", "assessment", "learning"]),
    ("legal", &["legal", "law", "contracts", "compliance", "regulation"]),
    ("marketing", &["marketing", "brand", "digital", "content", "campaign"]),
    ("sales", &["sales", "account", "business development", "client", "revenue"]),
];

pub const CERTIFICATIONS: &[&str] = &[
    // AWS
    "AWS Certified Cloud Practitioner",
    "AWS Certified Solutions Architect",
    "AWS Certified Developer",
    "AWS Certified SysOps Administrator",
    "AWS Certified DevOps Engineer",
    "AWS Certified Security Specialty",
    "AWS Certified Machine Learning Specialty",
    // Microsoft
    "Microsoft Certified: Azure Fundamentals",
    "Microsoft Certified: Azure Administrator Associate",
    "Microsoft Certified: Azure Developer Associate",
    "Microsoft Certified: Azure Solutions Architect Expert",
    // Google
    "Google Cloud Certified Associate Cloud Engineer",
    "Google Cloud Certified Professional Cloud Architect",
    "Google Cloud Certified Professional Data Engineer",
    // Networking and security
    "CCNA",
    "CCNP",
    "CCIE",
    "CompTIA A+",
    "CompTIA Network+",
    "CompTIA Security+",
    "CompTIA Linux+",
    "CompTIA Cloud+",
    "CISSP",
    "CISM",
    "Certified Ethical Hacker (CEH)",
    "OSCP",
    // Project and process
    "PMP",
    "CAPM",
    "Certified ScrumMaster (CSM)",
    "Professional Scrum Master (PSM)",
    "ITIL Foundation",
    "TOGAF",
    // Vendors
    "Oracle Certified Associate (OCA)",
    "Oracle Certified Professional (OCP)",
    "MySQL Database Administrator",
    "MongoDB Certified Developer",
    "Certified Kubernetes Administrator (CKA)",
    "Certified Kubernetes Application Developer (CKAD)",
    "Salesforce Certified Administrator",
];

pub const PROVIDERS: &[&str] = &[
    "AWS", "Amazon Web Services", "Microsoft", "Google Cloud", "Cisco", "CompTIA", "PMI",
    "Scrum Alliance", "Scrum.org", "Oracle", "MySQL", "MongoDB", "Linux Foundation",
    "EC-Council", "Offensive Security", "Salesforce", "ISACA", "(ISC)2", "Axelos",
    "The Open Group", "Coursera", "Udemy",
];

pub const SKILL_CERTIFICATION_KEYWORDS: &[(&str, &[&str])] = &[
    ("aws", &["AWS Certified", "Amazon Web Services"]),
    ("azure", &["Microsoft Certified: Azure", "Azure"]),
    ("google cloud", &["Google Cloud Professional", "Google Cloud Certified", "GCP"]),
    ("python", &["Python Developer", "Python Programming"]),
    ("java", &["Java Developer", "Java Certified", "Oracle Certified"]),
    ("javascript", &["JavaScript Developer", "Web Development"]),
    ("sql", &["SQL Developer", "Database", "Oracle", "MySQL", "PostgreSQL"]),
    ("cybersecurity", &["Security+", "CISSP", "CEH", "Cybersecurity"]),
    ("information security", &["Security+", "CISSP", "CISM"]),
    ("networking", &["CCNA", "CCNP", "Network+"]),
    ("scrum", &["ScrumMaster", "Scrum Master", "Agile"]),
    ("agile", &["ScrumMaster", "Scrum Master", "Agile"]),
    ("kubernetes", &["CKA", "CKAD", "Kubernetes"]),
    ("docker", &["Docker", "Container", "Kubernetes"]),
    ("devops", &["DevOps", "CI/CD", "Jenkins", "GitLab"]),
    ("project management", &["PMP", "CAPM", "Project Management"]),
    ("linux", &["Linux+", "Linux Foundation", "RHCSA"]),
];
